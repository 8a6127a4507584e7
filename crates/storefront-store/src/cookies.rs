//! High-level API for managing the credential pair cookies.

use crate::{CookieJar, CookieKeys, StorageError, StorageResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed lifetime of both token cookies.
pub const TOKEN_COOKIE_TTL: Duration = Duration::days(1);

/// A stored cookie with its transport attributes.
///
/// The value is the opaque token string; this store never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieRecord {
    /// Cookie value (opaque token)
    pub value: String,
    /// When the cookie expires
    pub expires_at: DateTime<Utc>,
    /// Secure-transport flag
    pub secure: bool,
}

impl CookieRecord {
    /// Create a record with the fixed token TTL and the secure flag set.
    pub fn token(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Utc::now() + TOKEN_COOKIE_TTL,
            secure: true,
        }
    }

    /// Whether the cookie has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// High-level API for storing and retrieving the credential pair.
///
/// At most one pair is valid at a time: writing a new pair overwrites both
/// cookies, superseding whatever was stored before.
pub struct CredentialStore {
    jar: Box<dyn CookieJar>,
}

impl CredentialStore {
    /// Create a new credential store with the given cookie backend.
    pub fn new(jar: Box<dyn CookieJar>) -> Self {
        Self { jar }
    }

    /// Persist both tokens as fresh 1-day secure cookies.
    pub fn set_token_pair(&self, access: &str, refresh: &str) -> StorageResult<()> {
        self.set_record(CookieKeys::ACCESS_TOKEN, &CookieRecord::token(access))?;
        self.set_record(CookieKeys::REFRESH_TOKEN, &CookieRecord::token(refresh))?;
        tracing::debug!("Stored credential pair cookies");
        Ok(())
    }

    /// Retrieve the access token, if present and unexpired.
    pub fn get_access_token(&self) -> StorageResult<Option<String>> {
        self.get_value(CookieKeys::ACCESS_TOKEN)
    }

    /// Retrieve the refresh token, if present and unexpired.
    pub fn get_refresh_token(&self) -> StorageResult<Option<String>> {
        self.get_value(CookieKeys::REFRESH_TOKEN)
    }

    /// Whether both token cookies are present and unexpired.
    pub fn has_token_pair(&self) -> StorageResult<bool> {
        Ok(self.get_access_token()?.is_some() && self.get_refresh_token()?.is_some())
    }

    /// Delete both token cookies.
    pub fn clear_tokens(&self) -> StorageResult<()> {
        self.jar.delete(CookieKeys::ACCESS_TOKEN)?;
        self.jar.delete(CookieKeys::REFRESH_TOKEN)?;
        tracing::debug!("Cleared credential pair cookies");
        Ok(())
    }

    fn set_record(&self, name: &str, record: &CookieRecord) -> StorageResult<()> {
        let encoded = serde_json::to_string(record)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.jar.set(name, &encoded)
    }

    /// Read a cookie, treating an expired or undecodable record as absent.
    ///
    /// An expired record is deleted eagerly, matching browser cookie
    /// semantics where an expired cookie is simply gone.
    fn get_value(&self, name: &str) -> StorageResult<Option<String>> {
        let Some(encoded) = self.jar.get(name)? else {
            return Ok(None);
        };

        let record: CookieRecord = match serde_json::from_str(&encoded) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(cookie = %name, error = %e, "Discarding undecodable cookie record");
                self.jar.delete(name)?;
                return Ok(None);
            }
        };

        if record.is_expired() {
            tracing::debug!(cookie = %name, "Cookie expired, discarding");
            self.jar.delete(name)?;
            return Ok(None);
        }

        Ok(Some(record.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryJar {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryJar {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    impl CookieJar for MemoryJar {
        fn set(&self, name: &str, value: &str) -> StorageResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, name: &str) -> StorageResult<Option<String>> {
            Ok(self.data.lock().unwrap().get(name).cloned())
        }

        fn delete(&self, name: &str) -> StorageResult<bool> {
            Ok(self.data.lock().unwrap().remove(name).is_some())
        }
    }

    fn create_test_store() -> CredentialStore {
        CredentialStore::new(Box::new(MemoryJar::new()))
    }

    #[test]
    fn test_token_record_attributes() {
        let record = CookieRecord::token("tok");
        assert!(record.secure);
        assert!(!record.is_expired());
        assert!(record.expires_at <= Utc::now() + TOKEN_COOKIE_TTL);
    }

    #[test]
    fn test_set_and_get_token_pair() {
        let store = create_test_store();
        store.set_token_pair("access-abc", "refresh-xyz").unwrap();

        assert_eq!(
            store.get_access_token().unwrap(),
            Some("access-abc".to_string())
        );
        assert_eq!(
            store.get_refresh_token().unwrap(),
            Some("refresh-xyz".to_string())
        );
        assert!(store.has_token_pair().unwrap());
    }

    #[test]
    fn test_new_pair_supersedes_old() {
        let store = create_test_store();
        store.set_token_pair("old-access", "old-refresh").unwrap();
        store.set_token_pair("new-access", "new-refresh").unwrap();

        assert_eq!(
            store.get_access_token().unwrap(),
            Some("new-access".to_string())
        );
        assert_eq!(
            store.get_refresh_token().unwrap(),
            Some("new-refresh".to_string())
        );
    }

    #[test]
    fn test_clear_tokens() {
        let store = create_test_store();
        store.set_token_pair("access", "refresh").unwrap();
        store.clear_tokens().unwrap();

        assert_eq!(store.get_access_token().unwrap(), None);
        assert_eq!(store.get_refresh_token().unwrap(), None);
        assert!(!store.has_token_pair().unwrap());
    }

    #[test]
    fn test_clear_tokens_when_empty_is_ok() {
        let store = create_test_store();
        store.clear_tokens().unwrap();
        assert!(!store.has_token_pair().unwrap());
    }

    #[test]
    fn test_expired_cookie_reads_as_absent() {
        let jar = MemoryJar::new();
        let expired = CookieRecord {
            value: "stale".to_string(),
            expires_at: Utc::now() - Duration::hours(1),
            secure: true,
        };
        jar.set(
            CookieKeys::ACCESS_TOKEN,
            &serde_json::to_string(&expired).unwrap(),
        )
        .unwrap();

        let store = CredentialStore::new(Box::new(jar));
        assert_eq!(store.get_access_token().unwrap(), None);
    }

    #[test]
    fn test_undecodable_record_reads_as_absent() {
        let jar = MemoryJar::new();
        jar.set(CookieKeys::REFRESH_TOKEN, "not json").unwrap();

        let store = CredentialStore::new(Box::new(jar));
        assert_eq!(store.get_refresh_token().unwrap(), None);
    }

    #[test]
    fn test_missing_one_cookie_means_no_pair() {
        let store = create_test_store();
        store.set_token_pair("access", "refresh").unwrap();
        store.jar.delete(CookieKeys::REFRESH_TOKEN).unwrap();

        assert!(!store.has_token_pair().unwrap());
        assert_eq!(
            store.get_access_token().unwrap(),
            Some("access".to_string())
        );
    }
}
