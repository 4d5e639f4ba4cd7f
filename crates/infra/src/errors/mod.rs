//! Error plumbing between third-party crates and [`wxkit_domain::WxError`].

pub mod conversions;

pub use conversions::InfraError;
