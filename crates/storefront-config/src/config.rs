//! Configuration management for the storefront client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default Storefront API base URL (can be overridden at compile time via
/// the STOREFRONT_API_URL env var).
pub const DEFAULT_API_URL: &str = match option_env!("STOREFRONT_API_URL") {
    Some(url) => url,
    None => "https://shop.example.com/api/v1/",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Storefront API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    /// Environment overrides are applied after the file is read.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply runtime environment overrides.
    fn load_from_env(&mut self) {
        if let Ok(url) = std::env::var("STOREFRONT_API_URL") {
            if !url.is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(level) = std::env::var("STOREFRONT_LOG_LEVEL") {
            if !level.is_empty() {
                self.log_level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        Url::parse(&self.api_url)?;
        Ok(())
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_base_dir()?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), contents)?;
        Ok(())
    }

    /// The API base URL with a guaranteed trailing slash, so endpoint
    /// paths can be appended directly.
    pub fn api_base(&self) -> String {
        if self.api_url.ends_with('/') {
            self.api_url.clone()
        } else {
            format!("{}/", self.api_url)
        }
    }
}

impl Config {
    /// Convenience constructor for tests and embedding.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_url: api_url.into(),
        }
    }
}
