use crate::resource::ResourceError;
use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.timeout_secs", "response.translated_text")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "request_builder", "translate")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// What the service (or the wire) told us when a call failed.
///
/// Built exactly once at the classification boundary and never mutated
/// afterwards. `status_code` is `None` when the request never produced an
/// HTTP response (DNS, connect, timeout, TLS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub status_code: Option<u16>,
    pub message: String,
    /// Raw response body, kept for diagnostics only.
    pub raw_body: Option<String>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
            raw_body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = Some(body.into());
        self
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "HTTP {} - {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Coarse error category, for callers that want to branch without
/// destructuring the full [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Validation,
    Authentication,
    RateLimited,
    ServiceUnavailable,
    Api,
    Decode,
    Configuration,
    Resource,
    Engine,
}

/// Unified error type for the caption bridge.
///
/// Every remote call resolves to one of the record-carrying variants; low-level
/// transport errors never leak through unwrapped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(ErrorRecord),

    #[error("Validation error: {0}")]
    Validation(ErrorRecord),

    #[error("Authentication error: {0}")]
    Authentication(ErrorRecord),

    #[error("Rate limited: {0}")]
    RateLimited(ErrorRecord),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(ErrorRecord),

    #[error("API error: {0}")]
    Api(ErrorRecord),

    #[error("Decode error: {message}{}", format_context(.context))]
    Decode {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Shared resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Engine error: {message}{}", format_context(.context))]
    Engine {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Connection(ErrorRecord::new(err.to_string()))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new decode error with structured context
    pub fn decode_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Decode {
            message: msg.into(),
            context,
        }
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::engine_with_context(msg, ErrorContext::new())
    }

    pub fn engine_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Engine {
            message: msg.into(),
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection(_) => ErrorKind::Connection,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::RateLimited(_) => ErrorKind::RateLimited,
            Error::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Error::Api(_) => ErrorKind::Api,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Resource(_) => ErrorKind::Resource,
            Error::Engine { .. } => ErrorKind::Engine,
        }
    }

    /// The classified record, for errors that came back from a remote call.
    pub fn record(&self) -> Option<&ErrorRecord> {
        match self {
            Error::Connection(r)
            | Error::Validation(r)
            | Error::Authentication(r)
            | Error::RateLimited(r)
            | Error::ServiceUnavailable(r)
            | Error::Api(r) => Some(r),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.record().and_then(|r| r.status_code)
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Decode { context, .. }
            | Error::Configuration { context, .. }
            | Error::Engine { context, .. } => Some(context),
            _ => None,
        }
    }

    /// True when the service was never reached, as opposed to reached and refusing.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}
