//! Integration tests with mock HTTP server

pub mod admin;
pub mod caption;
pub mod error_handling;
pub mod mock_server;
pub mod translate;
