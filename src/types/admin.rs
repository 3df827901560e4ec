//! Health and administration payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whatever the health endpoint reports. Only `status` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    /// Healthy unless the service says otherwise.
    pub fn is_healthy(&self) -> bool {
        match self.status.as_deref() {
            None => true,
            Some(s) => matches!(s.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheClearResponse {
    #[serde(default)]
    pub cleared_count: u64,
    #[serde(default)]
    pub cleared_services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCleanupResponse {
    #[serde(default)]
    pub freed_memory: bool,
    #[serde(default)]
    pub cleanup_details: String,
}
