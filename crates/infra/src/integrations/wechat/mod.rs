//! WeChat platform integration
//!
//! # Architecture
//!
//! ```text
//! OfficialAccountClient ─► DirectorySync ─┐
//!         │                               ▼
//!         └─────────────────────────► ApiContext ─► CredentialManager ─► ClientCredentialGrant
//! MiniProgramClient ─────────────────► ApiContext                                │
//!                                         │                                      ▼
//! OpenWebClient ──────────────────────────┴─────────────────────────────────► Transport
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use wxkit_domain::WxConfig;
//! use wxkit_infra::integrations::wechat::OfficialAccountClient;
//!
//! # async fn example() -> wxkit_domain::Result<()> {
//! let client = OfficialAccountClient::new(WxConfig::new("wx1234567890", "secret"))?;
//! let result = client.sync_users().await?;
//! println!("{} followers in {} ms", result.count, result.elapsed_millis);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod directory;
pub mod grant;
pub mod mini_program;
pub mod official_account;
pub mod open_web;

#[cfg(test)]
pub(crate) mod testing;

pub use context::ApiContext;
pub use directory::DirectorySync;
pub use grant::ClientCredentialGrant;
pub use mini_program::MiniProgramClient;
pub use official_account::OfficialAccountClient;
pub use open_web::OpenWebClient;
