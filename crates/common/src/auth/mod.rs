//! Access credential lifecycle
//!
//! Every authorized platform call needs the tenant's short-lived access token.
//! [`CredentialManager`] keeps exactly one cached [`Credential`] per tenant and
//! refreshes it through a [`CredentialSource`] only when it is absent or past
//! its expiry.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ CredentialManager  │  cache + single-flight refresh
//! └─────────┬──────────┘
//!           │
//!           ├──► CredentialSource   (client-credential grant, backed by HTTP)
//!           └──► Clock              (wall time for expiry checks)
//! ```
//!
//! Endpoint clients depend on the [`AccessTokenProvider`] trait rather than the
//! concrete manager so tests can hand them a fixed token.
//!
//! [`Credential`]: wxkit_domain::Credential

pub mod credential_manager;
pub mod traits;

pub use credential_manager::CredentialManager;
pub use traits::{AccessTokenProvider, CredentialSource};
