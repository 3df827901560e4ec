//! 类型模块：请求/响应信封与各服务的数据载荷。
//!
//! # Types Module
//!
//! Strongly-typed records for everything that crosses the wire. Envelopes are
//! validated once at the client boundary so the rest of the crate never
//! re-inspects untyped JSON.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`envelope`] | Request identity envelope and generic response envelope |
//! | [`caption`] | Caption generation and translation payloads |
//! | [`admin`] | Health check and service administration payloads |

pub mod admin;
pub mod caption;
pub mod envelope;

pub use admin::{CacheClearResponse, HealthStatus, MemoryCleanupResponse};
pub use caption::{
    CaptionFields, CaptionRequest, GenerationParams, TranslationFields, TranslationRequest,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT, MAX_TOKENS, MIN_TOKENS,
};
pub use envelope::{Identity, RequestEnvelope, ResponseEnvelope};
