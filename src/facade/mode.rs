use crate::catalog::EXEC_OPTIONS;
use crate::{Error, ErrorContext, Result};

/// Default base URL shown to users; never a real endpoint.
pub const PLACEHOLDER_BASE_URL: &str = "server_ip:port";

pub const INVALID_BASE_URL_MESSAGE: &str =
    "Error: Please provide a valid base_url for remote execution";

/// Where a caption or translation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecMode {
    Remote { base_url: String },
    Local,
}

impl ExecMode {
    pub fn remote(base_url: impl Into<String>) -> Self {
        ExecMode::Remote {
            base_url: base_url.into(),
        }
    }

    /// Code used in the exec option table (`remote` / `local`).
    pub fn code(&self) -> &'static str {
        match self {
            ExecMode::Remote { .. } => "remote",
            ExecMode::Local => "local",
        }
    }

    /// Mode from an exec option label (`远程`, `本地`) or code.
    ///
    /// `base_url` is only kept for remote mode and is not checked here.
    pub fn from_option(option: &str, base_url: &str) -> Result<Self> {
        match EXEC_OPTIONS.resolve(option) {
            Some("remote") => Ok(ExecMode::remote(base_url)),
            Some("local") => Ok(ExecMode::Local),
            _ => Err(Error::configuration_with_context(
                format!("unknown exec option '{}'", option),
                ErrorContext::new()
                    .with_field_path("exec_opt")
                    .with_details(format!("expected one of: {}", EXEC_OPTIONS.labels().join(", "))),
            )),
        }
    }
}

/// Reject empty and placeholder base URLs before any request is made.
pub fn checked_base_url(base_url: &str) -> Result<&str> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_BASE_URL {
        return Err(Error::configuration_with_context(
            INVALID_BASE_URL_MESSAGE,
            ErrorContext::new().with_field_path("base_url"),
        ));
    }
    Ok(trimmed)
}
