//! External service integrations

pub mod wechat;
