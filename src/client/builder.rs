use crate::client::core::ServiceClient;
use crate::config::ClientConfig;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`ServiceClient`].
///
/// Keep this surface area small and predictable.
pub struct ServiceClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ServiceClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Start from defaults with `CAPTION_BRIDGE_*` environment overrides.
    pub fn from_env() -> Self {
        Self {
            config: ClientConfig::from_env(),
            transport: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Request timeout. Granularity is whole seconds; any fraction rounds up,
    /// so 1500 ms becomes 2 s and nothing drops to zero.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let extra = u64::from(timeout.subsec_nanos() > 0);
        self.config.timeout_secs = timeout.as_secs().saturating_add(extra).max(1);
        self
    }

    pub fn user_name(mut self, user: impl Into<String>) -> Self {
        self.config.user_name = user.into();
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.config.ip_address = ip.into();
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    /// Rewrite `https://` base URLs to plain `http://`.
    ///
    /// Only for deployments whose service terminates plain HTTP behind a
    /// trusted network; each rewrite is logged at `warn`.
    pub fn downgrade_https(mut self, enable: bool) -> Self {
        self.config.downgrade_https = enable;
        self
    }

    pub fn caption_endpoint(mut self, path: impl Into<String>) -> Self {
        self.config.caption_endpoint = path.into();
        self
    }

    pub fn translate_endpoint(mut self, path: impl Into<String>) -> Self {
        self.config.translate_endpoint = path.into();
        self
    }

    /// Inject a transport. Default is [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ServiceClient> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };
        Ok(ServiceClient {
            config: self.config,
            transport,
        })
    }
}

impl Default for ServiceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
