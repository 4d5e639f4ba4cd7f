//! Platform constants
//!
//! Centralized location for the fixed values of the WeChat API family.

/// Default API host for all JSON endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.weixin.qq.com";
/// Host serving rendered official-account QR codes.
pub const DEFAULT_QR_BASE_URL: &str = "https://mp.weixin.qq.com";
/// Language requested for user profile hydration.
pub const DEFAULT_LANG: &str = "zh_CN";

// Directory sync
pub const DIRECTORY_PAGE_SIZE: usize = 10_000;
pub const HYDRATION_BATCH_SIZE: usize = 100;
pub const DEFAULT_HYDRATION_CONCURRENCY: usize = 16;

// Transport
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;

// Official account QR tickets
pub const DEFAULT_QR_EXPIRE_SECONDS: u32 = 360;
pub const QR_ACTION_NAME: &str = "QR_STR_SCENE";

// Mini program
pub const DEFAULT_MINI_PROGRAM_PAGE: &str = "pages/index/index";
pub const DEFAULT_URL_SCHEME_EXPIRE_TIME: i64 = 1_606_737_600;
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

// Material listing
pub const MATERIAL_MAX_COUNT: u32 = 20;
