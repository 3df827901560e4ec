//! Resource registry.

use super::{ResourceError, ResourceKind, ResourceState, SharedResource};
use crate::Result;
use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{info, warn};

struct HandleInner<R> {
    kind: ResourceKind,
    resource: Mutex<Option<R>>,
}

/// Shared handle to the single instance of `R`.
///
/// Clones point at the same instance. Every use goes through
/// [`SharedHandle::with_exclusive_access`], which holds the per-kind lock.
pub struct SharedHandle<R> {
    inner: Arc<HandleInner<R>>,
}

impl<R> Clone for SharedHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> fmt::Debug for SharedHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHandle")
            .field("kind", &self.inner.kind)
            .finish()
    }
}

impl<R: SharedResource> SharedHandle<R> {
    pub fn kind(&self) -> ResourceKind {
        self.inner.kind
    }

    /// Run `f` with the resource locked. Fails once the resource is released.
    pub fn with_exclusive_access<T>(&self, f: impl FnOnce(&mut R) -> T) -> Result<T> {
        let mut guard = self
            .inner
            .resource
            .lock()
            .map_err(|_| ResourceError::Poisoned {
                kind: self.inner.kind,
            })?;
        match guard.as_mut() {
            Some(resource) => Ok(f(resource)),
            None => Err(ResourceError::Released {
                kind: self.inner.kind,
            }
            .into()),
        }
    }

    pub fn is_released(&self) -> bool {
        match self.inner.resource.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    /// Whether two handles refer to the same instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

// arc-swap needs a sized pointee
struct ErasedHandle(Arc<dyn Any + Send + Sync>);

struct Slot {
    kind: ResourceKind,
    state: AtomicU8,
    init_lock: Mutex<()>,
    handle: ArcSwapOption<ErasedHandle>,
}

impl Slot {
    fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            state: AtomicU8::new(ResourceState::Uninitialized.to_u8()),
            init_lock: Mutex::new(()),
            handle: ArcSwapOption::empty(),
        }
    }

    fn state(&self) -> ResourceState {
        ResourceState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ResourceState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }

    // The init lock guards no data, so a panic inside a constructor leaves nothing to repair.
    fn lock_init(&self) -> MutexGuard<'_, ()> {
        self.init_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn downcast<R: SharedResource>(&self, erased: &ErasedHandle) -> Result<Arc<HandleInner<R>>> {
        Arc::clone(&erased.0)
            .downcast::<HandleInner<R>>()
            .map_err(|_| ResourceError::TypeMismatch { kind: self.kind }.into())
    }

    /// Lock-free read of a ready handle.
    fn ready_handle<R: SharedResource>(&self) -> Result<Option<SharedHandle<R>>> {
        match self.handle.load_full() {
            Some(erased) => Ok(Some(SharedHandle {
                inner: self.downcast::<R>(&erased)?,
            })),
            None => Ok(None),
        }
    }
}

/// Puts the slot back to `Uninitialized` if construction does not complete.
struct InitAttempt<'a> {
    slot: &'a Slot,
    done: bool,
}

impl Drop for InitAttempt<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.slot.set_state(ResourceState::Uninitialized);
        }
    }
}

/// Registry of per-kind singletons.
pub struct ResourceRegistry {
    slots: RwLock<HashMap<TypeId, Arc<Slot>>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn existing_slot<R: 'static>(&self) -> Option<Arc<Slot>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&TypeId::of::<R>()).cloned()
    }

    fn slot_for<R: 'static>(&self) -> Arc<Slot> {
        if let Some(slot) = self.existing_slot::<R>() {
            return slot;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(TypeId::of::<R>())
            .or_insert_with(|| Arc::new(Slot::new(ResourceKind::of::<R>())))
            .clone()
    }

    /// Get the shared `R`, building it with `init` if this is the first call.
    ///
    /// `init` runs at most once per kind even when many threads race here;
    /// the losers block until it finishes and get the same handle. If `init`
    /// fails the kind stays uninitialized and the next caller tries again.
    pub fn acquire<R, F>(&self, init: F) -> Result<SharedHandle<R>>
    where
        R: SharedResource,
        F: FnOnce() -> Result<R>,
    {
        let slot = self.slot_for::<R>();
        if let Some(handle) = slot.ready_handle::<R>()? {
            return Ok(handle);
        }

        let _init = slot.lock_init();
        if let Some(handle) = slot.ready_handle::<R>()? {
            return Ok(handle);
        }
        if slot.state() == ResourceState::Released {
            return Err(ResourceError::Released { kind: slot.kind }.into());
        }

        slot.set_state(ResourceState::Initializing);
        let mut attempt = InitAttempt {
            slot: &slot,
            done: false,
        };
        info!("Initializing shared resource {}", slot.kind);

        let resource = init().map_err(|e| {
            warn!("Failed to initialize {}: {}", slot.kind, e);
            e
        })?;

        let inner = Arc::new(HandleInner {
            kind: slot.kind,
            resource: Mutex::new(Some(resource)),
        });
        slot.handle
            .store(Some(Arc::new(ErasedHandle(inner.clone()))));
        slot.set_state(ResourceState::Ready);
        attempt.done = true;
        info!("Shared resource {} ready", slot.kind);

        Ok(SharedHandle { inner })
    }

    /// The ready handle, without building anything.
    pub fn get<R: SharedResource>(&self) -> Result<Option<SharedHandle<R>>> {
        match self.existing_slot::<R>() {
            Some(slot) => slot.ready_handle::<R>(),
            None => Ok(None),
        }
    }

    /// Tear down the shared `R`.
    ///
    /// Waits for any in-flight use, calls [`SharedResource::release`] and drops
    /// the value. Outstanding handles fail with [`ResourceError::Released`]
    /// from then on. Returns `false` if there was nothing to release.
    pub fn release<R: SharedResource>(&self) -> Result<bool> {
        let Some(slot) = self.existing_slot::<R>() else {
            return Ok(false);
        };

        let _init = slot.lock_init();
        let Some(erased) = slot.handle.swap(None) else {
            return Ok(false);
        };
        slot.set_state(ResourceState::Released);

        let inner = slot.downcast::<R>(&erased)?;
        let mut guard = inner.resource.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut resource) = guard.take() {
            info!("Releasing shared resource {}", slot.kind);
            resource.release();
        }
        drop(guard);

        info!("Released shared resource {}", slot.kind);
        Ok(true)
    }

    /// Run `f` on the shared `R` under its lock.
    ///
    /// Does not build the resource; waits if another thread is building it.
    pub fn with_exclusive_access<R, T>(&self, f: impl FnOnce(&mut R) -> T) -> Result<T>
    where
        R: SharedResource,
    {
        let kind = ResourceKind::of::<R>();
        let slot = self
            .existing_slot::<R>()
            .ok_or(ResourceError::NotInitialized { kind })?;

        let handle = match slot.ready_handle::<R>()? {
            Some(handle) => handle,
            None => {
                let _init = slot.lock_init();
                match slot.ready_handle::<R>()? {
                    Some(handle) => handle,
                    None if slot.state() == ResourceState::Released => {
                        return Err(ResourceError::Released { kind }.into())
                    }
                    None => return Err(ResourceError::NotInitialized { kind }.into()),
                }
            }
        };

        handle.with_exclusive_access(f)
    }

    pub fn state<R: 'static>(&self) -> ResourceState {
        self.existing_slot::<R>()
            .map_or(ResourceState::Uninitialized, |slot| slot.state())
    }

    /// Kinds this registry has seen, with their current state.
    pub fn snapshot(&self) -> Vec<(ResourceKind, ResourceState)> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<_> = slots.values().map(|s| (s.kind, s.state())).collect();
        out.sort_by_key(|(k, _)| k.name());
        out
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: Lazy<ResourceRegistry> = Lazy::new(ResourceRegistry::new);

/// Process-wide registry.
pub fn global_registry() -> &'static ResourceRegistry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ErrorKind};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    struct Model {
        weights: Vec<u8>,
        freed: Arc<AtomicUsize>,
    }

    impl SharedResource for Model {
        fn release(&mut self) {
            self.weights.clear();
            self.freed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn model(freed: &Arc<AtomicUsize>) -> Model {
        Model {
            weights: vec![1; 16],
            freed: freed.clone(),
        }
    }

    #[test]
    fn concurrent_first_acquire_builds_once() {
        let registry = ResourceRegistry::new();
        let built = AtomicUsize::new(0);
        let freed = Arc::new(AtomicUsize::new(0));
        let barrier = Barrier::new(8);

        let handles: Vec<SharedHandle<Model>> = thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        registry
                            .acquire(|| {
                                built.fetch_add(1, Ordering::SeqCst);
                                thread::sleep(Duration::from_millis(20));
                                Ok(model(&freed))
                            })
                            .unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(handles.windows(2).all(|w| SharedHandle::ptr_eq(&w[0], &w[1])));
        assert_eq!(registry.state::<Model>(), ResourceState::Ready);
    }

    #[test]
    fn exclusive_access_serializes_users() {
        let registry = ResourceRegistry::new();
        let freed = Arc::new(AtomicUsize::new(0));
        registry.acquire(|| Ok(model(&freed))).unwrap();

        let inside = AtomicUsize::new(0);
        let overlap = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    registry
                        .with_exclusive_access::<Model, _>(|m| {
                            if inside.fetch_add(1, Ordering::SeqCst) > 0 {
                                overlap.fetch_add(1, Ordering::SeqCst);
                            }
                            m.weights.push(0);
                            thread::sleep(Duration::from_millis(5));
                            inside.fetch_sub(1, Ordering::SeqCst);
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(overlap.load(Ordering::SeqCst), 0);
        let len = registry
            .with_exclusive_access::<Model, _>(|m| m.weights.len())
            .unwrap();
        assert_eq!(len, 20);
    }

    #[test]
    fn release_frees_and_blocks_further_use() {
        let registry = ResourceRegistry::new();
        let freed = Arc::new(AtomicUsize::new(0));
        let handle = registry.acquire(|| Ok(model(&freed))).unwrap();

        assert!(registry.release::<Model>().unwrap());
        assert_eq!(freed.load(Ordering::SeqCst), 1);
        assert_eq!(registry.state::<Model>(), ResourceState::Released);
        assert!(handle.is_released());

        let err = handle.with_exclusive_access(|m| m.weights.len()).unwrap_err();
        assert!(matches!(err, Error::Resource(ResourceError::Released { .. })));

        let err = registry
            .acquire(|| Ok(model(&freed)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);

        // second release is a no-op
        assert!(!registry.release::<Model>().unwrap());
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_init_can_be_retried() {
        let registry = ResourceRegistry::new();
        let freed = Arc::new(AtomicUsize::new(0));
        let err = registry
            .acquire::<Model, _>(|| Err(Error::engine("weights missing")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Engine);
        assert_eq!(registry.state::<Model>(), ResourceState::Uninitialized);

        registry.acquire(|| Ok(model(&freed))).unwrap();
        assert_eq!(registry.state::<Model>(), ResourceState::Ready);
    }

    #[test]
    fn use_before_acquire_is_an_error() {
        let registry = ResourceRegistry::new();
        let err = registry
            .with_exclusive_access::<Model, _>(|_| ())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Resource(ResourceError::NotInitialized { .. })
        ));
        assert!(registry.get::<Model>().unwrap().is_none());
        assert!(!registry.release::<Model>().unwrap());
    }

    #[test]
    fn kinds_are_independent() {
        struct Tokenizer;
        impl SharedResource for Tokenizer {}

        let registry = ResourceRegistry::new();
        let freed = Arc::new(AtomicUsize::new(0));
        registry.acquire(|| Ok(model(&freed))).unwrap();
        registry.acquire(|| Ok(Tokenizer)).unwrap();
        registry.release::<Tokenizer>().unwrap();

        assert_eq!(registry.state::<Model>(), ResourceState::Ready);
        assert_eq!(registry.state::<Tokenizer>(), ResourceState::Released);
        assert_eq!(registry.snapshot().len(), 2);
    }
}
