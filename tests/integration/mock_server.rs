//! Mock HTTP server setup for integration tests

use caption_bridge::ServiceClient;
use mockito::{Mock, Server, ServerGuard};

pub const TEST_USER: &str = "tester";
pub const TEST_IP: &str = "10.0.0.7";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub fn new() -> Self {
        let server = Server::new();
        let base_url = server.url();
        Self { server, base_url }
    }

    /// `host:port` without a scheme, the way users usually type it.
    pub fn bare_address(&self) -> String {
        self.base_url.trim_start_matches("http://").to_string()
    }

    /// Client with a fixed identity so request bodies are predictable.
    pub fn create_test_client(&self) -> ServiceClient {
        ServiceClient::builder()
            .user_name(TEST_USER)
            .ip_address(TEST_IP)
            .build()
            .expect("client builds with defaults")
    }

    /// Create a mock for a JSON response
    pub fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }
}
