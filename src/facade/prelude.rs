//! Minimal prelude for application code.
//!
//! Goal: reduce import noise without hiding important concepts.

pub use crate::caption::{parse_bilingual_caption, CaptionResult, CaptionSource, Language};
pub use crate::catalog::{build_prompt, BuiltPrompt};
pub use crate::client::{ServiceClient, ServiceClientBuilder};
pub use crate::facade::{CaptionService, ExecMode};
pub use crate::local::{CaptionEngine, LocalCaptioner};
pub use crate::resource::{global_registry, ResourceRegistry, SharedResource};
pub use crate::types::{CaptionRequest, GenerationParams, Identity, TranslationRequest};
pub use crate::{Error, Result};
