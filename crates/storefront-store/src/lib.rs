//! Durable client-side credential storage for the storefront client.
//!
//! This crate provides:
//! - A [`CookieJar`] trait abstracting the cookie backend
//! - A file-backed implementation ([`FileCookieJar`])
//! - A high-level [`CredentialStore`] that owns the access/refresh token
//!   cookies, including their expiry and secure-transport attributes

mod cookies;
mod file;
mod keys;
mod traits;

pub use cookies::{CookieRecord, CredentialStore, TOKEN_COOKIE_TTL};
pub use file::FileCookieJar;
pub use keys::CookieKeys;
pub use traits::CookieJar;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Cookie backend error: {0}")]
    Backend(String),

    /// Key not found
    #[error("Cookie not found: {0}")]
    NotFound(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory jar for testing
    pub struct MemoryJar {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryJar {
        pub fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    impl CookieJar for MemoryJar {
        fn set(&self, name: &str, value: &str) -> StorageResult<()> {
            let mut data = self.data.lock().unwrap();
            data.insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, name: &str) -> StorageResult<Option<String>> {
            let data = self.data.lock().unwrap();
            Ok(data.get(name).cloned())
        }

        fn delete(&self, name: &str) -> StorageResult<bool> {
            let mut data = self.data.lock().unwrap();
            Ok(data.remove(name).is_some())
        }
    }

    #[test]
    fn test_memory_jar_set_get_delete() {
        let jar = MemoryJar::new();
        jar.set("access_token", "abc").unwrap();
        assert_eq!(jar.get("access_token").unwrap(), Some("abc".to_string()));
        assert!(jar.has("access_token").unwrap());

        assert!(jar.delete("access_token").unwrap());
        assert_eq!(jar.get("access_token").unwrap(), None);
        assert!(!jar.delete("access_token").unwrap());
    }
}
