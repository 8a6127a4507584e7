//! File system paths for the storefront client.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Manages file system paths for the storefront client.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for client state (~/.storefront)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.storefront`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".storefront"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.storefront).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.storefront/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the cookie file path (~/.storefront/cookies.json).
    pub fn cookie_file(&self) -> PathBuf {
        self.base_dir.join("cookies.json")
    }

    /// Create the base directory if it doesn't exist.
    pub fn ensure_base_dir(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}
