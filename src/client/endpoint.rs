//! Remote endpoints consumed by the client.

use crate::config::ClientConfig;
use crate::transport::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    HealthCheck,
    ClearCache,
    MemoryCleanup,
    GenerateCaption,
    Translate,
}

impl Endpoint {
    pub const HEALTH_CHECK_PATH: &'static str = "health/direct";
    pub const CLEAR_CACHE_PATH: &'static str = "admin/clear-cache";
    pub const MEMORY_CLEANUP_PATH: &'static str = "admin/cleanup-memory";

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::HealthCheck => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Path relative to the base URL. Caption and translation paths are configurable.
    pub fn path<'a>(&self, config: &'a ClientConfig) -> &'a str {
        match self {
            Endpoint::HealthCheck => Self::HEALTH_CHECK_PATH,
            Endpoint::ClearCache => Self::CLEAR_CACHE_PATH,
            Endpoint::MemoryCleanup => Self::MEMORY_CLEANUP_PATH,
            Endpoint::GenerateCaption => &config.caption_endpoint,
            Endpoint::Translate => &config.translate_endpoint,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::HealthCheck => "health_check",
            Endpoint::ClearCache => "clear_cache",
            Endpoint::MemoryCleanup => "cleanup_memory",
            Endpoint::GenerateCaption => "generate_caption",
            Endpoint::Translate => "translate",
        }
    }
}
