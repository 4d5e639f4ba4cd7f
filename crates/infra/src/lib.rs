//! # wxkit Infrastructure
//!
//! Everything in wxkit that performs I/O.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport and the `errcode` envelope
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//! - The WeChat endpoint clients and directory synchronization
//!
//! ## Architecture
//! - Credential caching and payload decoding live in `wxkit-common`
//! - Data model and errors live in `wxkit-domain`

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{ApiBody, ApiRequest, HttpClient, ResponseMode, Transport};
pub use integrations::wechat::{
    ApiContext, DirectorySync, MiniProgramClient, OfficialAccountClient, OpenWebClient,
};
