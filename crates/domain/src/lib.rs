//! # wxkit Domain
//!
//! Platform-independent types for the wxkit client.
//!
//! This crate contains:
//! - The workspace error type and `Result` alias
//! - Credential, directory and payload data model
//! - Configuration structures
//! - Platform constants
//!
//! ## Architecture
//! - No dependencies on other wxkit crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
