//! Domain types and models

pub mod credential;
pub mod directory;
pub mod payload;
pub mod wechat;

pub use credential::{AccessTokenResponse, Credential};
pub use directory::{
    AggregationResult, DirectoryPage, DirectorySnapshot, UserListData, UserListResponse, UserRecord,
};
pub use payload::{DecodedPayload, EncryptedPayload, Watermark};
pub use wechat::*;
