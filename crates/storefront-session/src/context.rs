//! Explicitly constructed session context.
//!
//! This replaces the ambient global session of the original design: the
//! context is created at a defined initialization point and handed to the
//! components that need it. Reads are snapshot-based clones; the only
//! writer is the session manager.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;

/// The authenticated identity decoded from the access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID
    pub user_id: u64,
    /// Username
    pub username: String,
}

#[derive(Debug, Default)]
struct Session {
    identity: Option<Identity>,
    raw_profile: Option<Value>,
}

/// Process-wide session state, initialized empty.
///
/// `is_logged_in` is always derived from `identity` rather than stored, so
/// the two can never disagree. The session is never partially updated:
/// identity and profile each change through exactly one mutator.
#[derive(Debug, Default)]
pub struct SessionContext {
    inner: Mutex<Session>,
}

impl SessionContext {
    /// Create an empty session context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The single identity mutator. Passing `None` clears the session.
    pub fn set_identity(&self, identity: Option<Identity>) {
        let mut session = self.inner.lock().unwrap();
        session.identity = identity;
    }

    /// Snapshot of the current identity.
    pub fn identity(&self) -> Option<Identity> {
        self.inner.lock().unwrap().identity.clone()
    }

    /// Whether an identity is set. Derived, never stored.
    pub fn is_logged_in(&self) -> bool {
        self.inner.lock().unwrap().identity.is_some()
    }

    /// Replace the cached raw profile.
    pub fn set_profile(&self, profile: Option<Value>) {
        let mut session = self.inner.lock().unwrap();
        session.raw_profile = profile;
    }

    /// Snapshot of the cached raw profile.
    pub fn profile(&self) -> Option<Value> {
        self.inner.lock().unwrap().raw_profile.clone()
    }

    /// The vendor id carried by the cached profile, if any.
    pub fn cached_vendor_id(&self) -> Option<i64> {
        self.inner
            .lock()
            .unwrap()
            .raw_profile
            .as_ref()
            .and_then(|p| p.get("vendor_id"))
            .and_then(|v| v.as_i64())
    }
}
