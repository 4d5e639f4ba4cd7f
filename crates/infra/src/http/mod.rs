//! HTTP transport
//!
//! [`Transport`] is the seam every platform call goes through. [`HttpClient`]
//! is the reqwest-backed implementation; tests substitute their own.

pub mod client;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use transport::{check_envelope, decode_body, ApiBody, ApiRequest, ResponseMode, Transport};
