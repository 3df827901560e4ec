//! 共享资源模块：对昂贵的本地资源（如模型）做惰性构建与互斥访问。
//!
//! # Shared resources
//!
//! A process holds at most one instance of each heavyweight resource kind
//! (a loaded model, say). The [`ResourceRegistry`] builds it on first use,
//! hands every caller the same [`SharedHandle`], serializes all access behind a
//! per-kind mutex, and tears it down on [`ResourceRegistry::release`].
//!
//! Construction is one-shot: once a kind is released it cannot be acquired
//! again from the same registry.

mod registry;

pub use registry::{global_registry, ResourceRegistry, SharedHandle};

use std::any::TypeId;
use std::fmt;

/// Something expensive that must not be used concurrently.
pub trait SharedResource: Send + 'static {
    /// Free the underlying memory. Called once, under the resource lock,
    /// right before the value is dropped.
    fn release(&mut self) {}
}

/// Stable identity of a resource kind: its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    id: TypeId,
    name: &'static str,
}

impl ResourceKind {
    pub fn of<R: 'static>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: std::any::type_name::<R>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Uninitialized,
    Initializing,
    Ready,
    Released,
}

impl ResourceState {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            ResourceState::Uninitialized => 0,
            ResourceState::Initializing => 1,
            ResourceState::Ready => 2,
            ResourceState::Released => 3,
        }
    }

    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => ResourceState::Initializing,
            2 => ResourceState::Ready,
            3 => ResourceState::Released,
            _ => ResourceState::Uninitialized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("{kind} has been released and cannot be used or rebuilt")]
    Released { kind: ResourceKind },

    #[error("{kind} has not been initialized")]
    NotInitialized { kind: ResourceKind },

    #[error("lock for {kind} is poisoned")]
    Poisoned { kind: ResourceKind },

    #[error("registry slot for {kind} holds a different type")]
    TypeMismatch { kind: ResourceKind },
}

impl ResourceError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceError::Released { kind }
            | ResourceError::NotInitialized { kind }
            | ResourceError::Poisoned { kind }
            | ResourceError::TypeMismatch { kind } => *kind,
        }
    }
}
