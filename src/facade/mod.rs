//! Application-facing facade.
//!
//! The client and the local captioner report every failure as an error. This
//! layer is where those errors are turned into placeholder captions or
//! pass-through text for callers that must always produce output.

pub mod mode;
pub mod prelude;
pub mod service;

pub use mode::{checked_base_url, ExecMode, INVALID_BASE_URL_MESSAGE, PLACEHOLDER_BASE_URL};
pub use service::{CaptionService, LocalBackend};
