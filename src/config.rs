//! Client configuration.
//!
//! Defaults are production-friendly; every knob can be overridden from YAML or
//! from the environment:
//! - `CAPTION_BRIDGE_TIMEOUT_SECS`
//! - `CAPTION_BRIDGE_USER`
//! - `CAPTION_BRIDGE_IP`
//! - `CAPTION_BRIDGE_PROXY_URL`
//! - `CAPTION_BRIDGE_DOWNGRADE_HTTPS` (`1` or `true`)

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_USER_NAME: &str = "anonymous";
pub const DEFAULT_IP_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_CAPTION_ENDPOINT: &str = "joycaption/generate";
pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "translate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub timeout_secs: u64,
    /// Identity sent as `user_name` when a payload does not carry one.
    pub user_name: String,
    /// Identity sent as `ip_address` when a payload does not carry one.
    pub ip_address: String,
    /// Extra headers attached to every request.
    pub default_headers: BTreeMap<String, String>,
    pub proxy_url: Option<String>,
    /// Rewrite `https://` base URLs to `http://`. Off unless asked for; every
    /// rewrite is logged at `warn`.
    pub downgrade_https: bool,
    pub caption_endpoint: String,
    pub translate_endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_name: DEFAULT_USER_NAME.to_string(),
            ip_address: DEFAULT_IP_ADDRESS.to_string(),
            default_headers: BTreeMap::new(),
            proxy_url: None,
            downgrade_https: false,
            caption_endpoint: DEFAULT_CAPTION_ENDPOINT.to_string(),
            translate_endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid client config: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Cannot read client config: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = env::var("CAPTION_BRIDGE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.timeout_secs = secs;
        }
        if let Some(user) = non_empty_var("CAPTION_BRIDGE_USER") {
            self.user_name = user;
        }
        if let Some(ip) = non_empty_var("CAPTION_BRIDGE_IP") {
            self.ip_address = ip;
        }
        if let Some(proxy) = non_empty_var("CAPTION_BRIDGE_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        if let Some(flag) = non_empty_var("CAPTION_BRIDGE_DOWNGRADE_HTTPS") {
            self.downgrade_https = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::new().with_field_path("config.timeout_secs"),
            ));
        }
        if self.caption_endpoint.trim_matches('/').is_empty() {
            return Err(Error::configuration_with_context(
                "caption endpoint must not be empty",
                ErrorContext::new().with_field_path("config.caption_endpoint"),
            ));
        }
        if self.translate_endpoint.trim_matches('/').is_empty() {
            return Err(Error::configuration_with_context(
                "translate endpoint must not be empty",
                ErrorContext::new().with_field_path("config.translate_endpoint"),
            ));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_sentinel_identity() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.user_name, "anonymous");
        assert_eq!(cfg.ip_address, "127.0.0.1");
        assert_eq!(cfg.timeout_secs, 60);
        assert!(!cfg.downgrade_https);
    }

    #[test]
    fn yaml_fills_missing_fields_from_defaults() {
        let cfg = ClientConfig::from_yaml_str(
            "timeout_secs: 5\nuser_name: studio\ndefault_headers:\n  x-team: caption\n",
        )
        .unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.user_name, "studio");
        assert_eq!(cfg.ip_address, DEFAULT_IP_ADDRESS);
        assert_eq!(cfg.default_headers.get("x-team").map(String::as_str), Some("caption"));
        assert_eq!(cfg.caption_endpoint, DEFAULT_CAPTION_ENDPOINT);
    }

    #[test]
    fn bad_yaml_is_a_configuration_error() {
        let err = ClientConfig::from_yaml_str("timeout_secs: [not, a, number]").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
