use crate::paths::PathManager;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Query parameter carrying an encoded watched list in share links
pub const DEFAULT_SHARE_PARAM: &str = "list";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct StorageConfig {
    /// Overrides `<data_dir>/store` as the location of the persisted collections
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShareConfig {
    /// Origin and path the share link points at
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_share_param")]
    pub param: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write logs to a daily-rotated file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://watchbook.app/".to_string()
}

fn default_share_param() -> String {
    DEFAULT_SHARE_PARAM.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            param: default_share_param(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Defaults for a fresh install: logs go to the rotated file under the log directory
    pub fn for_paths(paths: &PathManager) -> Self {
        Self {
            logging: LoggingConfig {
                file: Some(paths.log_file()),
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.share.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!("share.base_url cannot be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "share.base_url must start with http:// or https://: {}",
                base_url
            ));
        }

        let param = &self.share.param;
        if param.is_empty() || !param.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(anyhow::anyhow!("Invalid share.param: {:?}", param));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!("Invalid logging.level: {}", self.logging.level));
        }

        Ok(())
    }
}
