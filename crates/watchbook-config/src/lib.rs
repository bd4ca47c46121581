pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, ShareConfig, StorageConfig, DEFAULT_SHARE_PARAM};
pub use paths::{PathManager, home_override};
