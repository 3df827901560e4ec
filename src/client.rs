//! Client for the remote caption/translation service.
//!
//! Keep the public surface small and predictable. Implementation details are
//! split into submodules under `src/client/`:
//! request construction, error classification, and the typed client itself.

pub mod builder;
pub mod core;
pub mod endpoint;
pub mod error_classification;
pub mod request;

pub use builder::ServiceClientBuilder;
pub use core::ServiceClient;
pub use endpoint::Endpoint;
pub use error_classification::{classify, kind_for_status};
pub use request::{join_url, normalize_base_url, RequestBuilder, ServiceCall};
