//! Shared runtime building blocks for wxkit.
//!
//! - [`auth`]: per-tenant access credential caching with single-flight refresh
//! - [`crypto`]: AES-128-CBC payload decoding with watermark verification
//! - [`time`]: wall-clock abstraction so credential expiry is testable

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod crypto;
pub mod time;

pub use auth::{AccessTokenProvider, CredentialManager, CredentialSource};
pub use crypto::{decode_payload, PayloadDecoder};
pub use time::{Clock, MockClock, SystemClock};
