//! File-backed cookie jar.
//!
//! Cookies are held in a single JSON object on disk, loaded once at
//! construction and rewritten on every mutation. The file lives in the
//! client's state directory and is created with owner-only permissions.

use crate::{CookieJar, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Cookie jar persisted to a JSON file.
pub struct FileCookieJar {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileCookieJar {
    /// Open (or create) a cookie jar at the given path.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Cookie file unreadable, starting empty");
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    fn persist(&self, data: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

impl CookieJar for FileCookieJar {
    fn set(&self, name: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.lock().unwrap();
        data.insert(name.to_string(), value.to_string());
        self.persist(&data)
    }

    fn get(&self, name: &str) -> StorageResult<Option<String>> {
        let data = self.data.lock().unwrap();
        Ok(data.get(name).cloned())
    }

    fn delete(&self, name: &str) -> StorageResult<bool> {
        let mut data = self.data.lock().unwrap();
        let removed = data.remove(name).is_some();
        if removed {
            self.persist(&data)?;
        }
        Ok(removed)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> StorageResult<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> StorageResult<()> {
    Ok(())
}
