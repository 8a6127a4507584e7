//! Storage trait definitions.

use crate::StorageResult;

/// Trait for cookie storage backends
pub trait CookieJar: Send + Sync {
    /// Store a cookie value
    fn set(&self, name: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a cookie value
    fn get(&self, name: &str) -> StorageResult<Option<String>>;

    /// Delete a cookie
    fn delete(&self, name: &str) -> StorageResult<bool>;

    /// Check if a cookie exists
    fn has(&self, name: &str) -> StorageResult<bool> {
        Ok(self.get(name)?.is_some())
    }
}
