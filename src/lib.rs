//! # caption-bridge
//!
//! 图像描述服务的客户端桥接库：远程调用、中英双语解析与本地模型的共享资源管理。
//!
//! Client bridge for a remote image-captioning and translation service.
//!
//! ## Overview
//!
//! A caption service answers two kinds of calls: "describe this image" and
//! "translate this text", plus a few administrative ones. This crate wraps
//! them in a typed, synchronous client with a uniform error taxonomy, parses
//! free-form model output into an English/Chinese pair, and guards a single
//! shared local model instance for the in-process path.
//!
//! ## Key Features
//!
//! - **Typed client**: [`ServiceClient`] builds the identity envelope, sends
//!   JSON or multipart requests and classifies every response into [`Error`]
//! - **Bilingual parsing**: [`parse_bilingual_caption`] splits model output by
//!   markers, then by script, and reports how it did so
//! - **Shared resources**: [`resource::ResourceRegistry`] builds each heavy
//!   resource at most once and serializes access to it
//! - **Degrade facade**: [`facade::CaptionService`] turns failures into
//!   placeholder output for callers that must always produce something
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caption_bridge::{ServiceClient, TranslationRequest};
//!
//! fn main() -> caption_bridge::Result<()> {
//!     let client = ServiceClient::builder().user_name("alice").build()?;
//!     let text = client.translate("10.0.0.2:8000", &TranslationRequest::new("你好"))?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Request building, error classification and the typed client |
//! | [`transport`] | Wire request model and the reqwest-backed transport |
//! | [`types`] | Envelopes and per-endpoint payloads |
//! | [`caption`] | Caption results and the bilingual parser |
//! | [`catalog`] | Option tables and prompt templates |
//! | [`resource`] | Process-wide shared resource registry |
//! | [`local`] | Local captioning on a guarded engine |
//! | [`facade`] | Execution modes and use-site degradation |
//! | [`config`] | Client configuration from defaults, YAML and environment |

pub mod caption;
pub mod catalog;
pub mod client;
pub mod config;
pub mod facade;
pub mod local;
pub mod resource;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use caption::{parse_bilingual_caption, BilingualParser, CaptionResult, CaptionSource, Language};
pub use client::{ServiceClient, ServiceClientBuilder};
pub use config::ClientConfig;
pub use types::{CaptionRequest, GenerationParams, Identity, TranslationRequest};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind, ErrorRecord};
