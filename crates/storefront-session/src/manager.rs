//! Session manager owning the credential pair lifecycle.
//!
//! The manager is the sole writer of the session context's identity. Every
//! operation drives the session FSM, persists tokens before publishing the
//! identity, and surfaces failures exactly once - there is no automatic
//! retry anywhere in this client.

use crate::api::{RegistrationRequest, StorefrontClient, TokenPair};
use crate::claims::{decode_claims, is_expired};
use crate::context::{Identity, SessionContext};
use crate::notifier::{Notifier, TracingNotifier};
use crate::session_fsm::{SessionMachine, SessionMachineInput, SessionState};
use crate::{SessionError, SessionResult};
use std::sync::{Arc, Mutex};
use storefront_store::CredentialStore;
use tracing::{debug, info, warn};

/// Session manager for the storefront client.
///
/// The FSM tracks transient states (logging in, refreshing, restoring) that
/// aren't persisted, while the credential pair itself lives in cookie
/// storage. The session context is shared with whoever renders or guards on
/// it; only this manager mutates it.
pub struct SessionManager {
    store: CredentialStore,
    client: StorefrontClient,
    context: Arc<SessionContext>,
    /// Internal FSM for tracking session state transitions.
    fsm: Mutex<SessionMachine>,
    /// Sink for user-visible acknowledgments and alerts.
    notifier: Box<dyn Notifier>,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new(
        store: CredentialStore,
        client: StorefrontClient,
        context: Arc<SessionContext>,
    ) -> Self {
        Self {
            store,
            client,
            context,
            fsm: Mutex::new(SessionMachine::new()),
            notifier: Box::new(TracingNotifier),
        }
    }

    /// Create a session manager with a custom notifier.
    pub fn with_notifier(
        store: CredentialStore,
        client: StorefrontClient,
        context: Arc<SessionContext>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            client,
            context,
            fsm: Mutex::new(SessionMachine::new()),
            notifier,
        }
    }

    /// The shared session context.
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// The Storefront API client.
    pub fn client(&self) -> &StorefrontClient {
        &self.client
    }

    /// Get the current FSM state.
    pub fn fsm_state(&self) -> SessionState {
        let fsm = self.fsm.lock().unwrap();
        SessionState::from(fsm.state())
    }

    /// Whether an identity is currently set.
    pub fn is_logged_in(&self) -> bool {
        self.context.is_logged_in()
    }

    /// Transition the FSM, logging state changes.
    fn transition(&self, input: &SessionMachineInput) -> SessionResult<SessionState> {
        let mut fsm = self.fsm.lock().unwrap();
        let old_state = SessionState::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            SessionError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_state = SessionState::from(fsm.state());
        if old_state != new_state {
            debug!(
                old_state = ?old_state,
                new_state = ?new_state,
                "Session state transition"
            );
        }

        Ok(new_state)
    }

    /// Login with email and password.
    ///
    /// FSM: NotLoggedIn/LoggedIn -> LoggingIn -> (LoggedIn | NotLoggedIn).
    /// On success both tokens are persisted and the identity published
    /// before this returns, so dependent reads see the new session. A
    /// failed re-login keeps the existing session.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<Identity> {
        self.transition(&SessionMachineInput::LoginAttempt)?;
        self.login_inner(email, password).await
    }

    /// The login body, entered either directly or chained from `register`.
    /// Expects the FSM to already be in LoggingIn.
    async fn login_inner(&self, email: &str, password: &str) -> SessionResult<Identity> {
        let pair = match self.client.obtain_token(email, password).await {
            Ok(pair) => pair,
            Err(e) => {
                self.fail_login()?;
                self.notifier.alert(&e.detail());
                return Err(e);
            }
        };

        let identity = match self.adopt_pair(&pair) {
            Ok(identity) => identity,
            Err(e) => {
                self.fail_login()?;
                self.notifier.alert(&e.detail());
                return Err(e);
            }
        };

        self.transition(&SessionMachineInput::LoginSuccess)?;
        self.notifier
            .acknowledge(&format!("Logged in as {}", identity.username));
        info!(user_id = identity.user_id, "Login successful");

        Ok(identity)
    }

    /// Record a login failure. A failed re-login leaves the existing
    /// session (identity and cookies) in place, so the FSM returns to
    /// LoggedIn instead of NotLoggedIn in that case.
    fn fail_login(&self) -> SessionResult<()> {
        let input = if self.context.is_logged_in() {
            SessionMachineInput::ReloginFailed
        } else {
            SessionMachineInput::LoginFailed
        };
        self.transition(&input)?;
        Ok(())
    }

    /// Register a new account, then chain into login with the same
    /// credentials.
    ///
    /// FSM: NotLoggedIn -> Registering -> LoggingIn -> (LoggedIn | NotLoggedIn).
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
        password: &str,
        password_confirm: &str,
    ) -> SessionResult<Identity> {
        self.transition(&SessionMachineInput::RegisterAttempt)?;

        let request = RegistrationRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
            password2: password_confirm.to_string(),
        };

        if let Err(e) = self.client.register(&request).await {
            self.transition(&SessionMachineInput::RegisterFailed)?;
            self.notifier.alert(&e.detail());
            return Err(e);
        }

        info!(email = %email, "Account created");
        self.notifier.acknowledge("Account created");
        self.transition(&SessionMachineInput::RegisterAccepted)?;

        self.login_inner(email, password).await
    }

    /// Rebuild the session from the persisted cookies.
    ///
    /// FSM: NotLoggedIn -> Restoring -> (NotLoggedIn | Refreshing | LoggedIn).
    ///
    /// Returns:
    /// - `Ok(true)` if a session was adopted (directly or via refresh)
    /// - `Ok(false)` if either cookie is absent (session stays empty)
    /// - `Err(...)` if the stored pair was expired and the refresh failed;
    ///   the caller has no fallback, so the session has been cleared
    pub async fn restore_session(&self) -> SessionResult<bool> {
        self.transition(&SessionMachineInput::RestoreAttempt)?;

        let access = self.store.get_access_token()?;
        let refresh = self.store.get_refresh_token()?;
        let (Some(access), Some(refresh)) = (access, refresh) else {
            info!("No stored credential pair, session stays empty");
            self.transition(&SessionMachineInput::NoStoredTokens)?;
            return Ok(false);
        };

        if is_expired(&access) {
            info!("Stored access token expired, refreshing before adopting");
            self.transition(&SessionMachineInput::StoredTokenExpired)?;
            self.refresh_inner(&refresh).await?;
            return Ok(true);
        }

        // Unexpired pair: adopt it directly as the active session. The
        // claims are decodable here because is_expired treats any
        // undecodable token as expired.
        let claims = decode_claims(&access)?;
        self.context.set_identity(Some(Identity {
            user_id: claims.user_id,
            username: claims.username,
        }));
        self.transition(&SessionMachineInput::StoredTokensAdopted)?;
        info!(user_id = claims.user_id, "Session restored from stored cookies");

        Ok(true)
    }

    /// Exchange the stored refresh token for a new credential pair.
    ///
    /// Single attempt; a failure clears the session and propagates.
    pub async fn refresh(&self) -> SessionResult<TokenPair> {
        let refresh = self
            .store
            .get_refresh_token()?
            .ok_or(SessionError::NotLoggedIn)?;

        // Valid from LoggedIn, and from NotLoggedIn when only the stored
        // cookies exist (cold refresh).
        self.transition(&SessionMachineInput::AccessTokenExpired)?;

        self.refresh_inner(&refresh).await
    }

    /// Refresh body. Expects the FSM to be in Refreshing.
    async fn refresh_inner(&self, refresh: &str) -> SessionResult<TokenPair> {
        let adopted = match self.client.refresh_token(refresh).await {
            Ok(pair) => self.adopt_pair(&pair).map(|_| pair),
            Err(e) => Err(e),
        };

        match adopted {
            Ok(pair) => {
                self.transition(&SessionMachineInput::RefreshSuccess)?;
                info!("Credential pair refreshed");
                Ok(pair)
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, clearing session");
                self.store.clear_tokens()?;
                self.context.set_identity(None);
                let _ = self.transition(&SessionMachineInput::RefreshFailed);
                self.notifier.alert(&e.detail());
                Err(e)
            }
        }
    }

    /// Logout by deleting both cookies and clearing the identity.
    ///
    /// Unconditional: succeeds from any prior state.
    pub fn logout(&self) -> SessionResult<()> {
        // Tolerate logout from any state - storage is cleared regardless.
        let _ = self.transition(&SessionMachineInput::LogoutRequested);

        self.store.clear_tokens()?;
        self.context.set_identity(None);
        self.context.set_profile(None);

        let _ = self.transition(&SessionMachineInput::LogoutComplete);

        self.notifier.acknowledge("Logged out");
        info!("Logged out");
        Ok(())
    }

    /// Persist a new pair, then publish the identity decoded from it.
    ///
    /// Ordering matters: tokens are durable before the identity becomes
    /// visible, so a reader that sees the identity can rely on the cookies.
    fn adopt_pair(&self, pair: &TokenPair) -> SessionResult<Identity> {
        let claims = decode_claims(&pair.access)?;

        self.store.set_token_pair(&pair.access, &pair.refresh)?;

        let identity = Identity {
            user_id: claims.user_id,
            username: claims.username,
        };
        self.context.set_identity(Some(identity.clone()));

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::test_tokens::make_token;
    use chrono::Utc;
    use std::collections::HashMap;
    use storefront_store::{CookieJar, CookieRecord, StorageResult};

    /// In-memory jar for testing.
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

    fn create_test_manager() -> SessionManager {
        let store = CredentialStore::new(Box::new(MemoryJar::new()));
        // Unroutable address: any request fails with a transport error.
        let client = StorefrontClient::new("http://127.0.0.1:1/api/v1/");
        SessionManager::new(store, client, Arc::new(SessionContext::new()))
    }

    fn future_exp() -> i64 {
        Utc::now().timestamp() + 3600
    }

    fn past_exp() -> i64 {
        Utc::now().timestamp() - 3600
    }

    #[test]
    fn test_initial_state() {
        let manager = create_test_manager();
        assert_eq!(manager.fsm_state(), SessionState::NotLoggedIn);
        assert!(!manager.is_logged_in());
    }

    #[test]
    fn test_adopt_pair_sets_identity_from_claims() {
        let manager = create_test_manager();
        let pair = TokenPair {
            access: make_token(42, "maria", future_exp()),
            refresh: make_token(42, "maria", future_exp()),
        };

        let identity = manager.adopt_pair(&pair).unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.username, "maria");

        assert!(manager.is_logged_in());
        assert_eq!(manager.context().identity().unwrap().user_id, 42);
    }

    #[test]
    fn test_adopt_pair_persists_before_identity() {
        let manager = create_test_manager();
        let pair = TokenPair {
            access: make_token(7, "joe", future_exp()),
            refresh: make_token(7, "joe", future_exp()),
        };
        manager.adopt_pair(&pair).unwrap();

        assert_eq!(
            manager.store.get_access_token().unwrap(),
            Some(pair.access.clone())
        );
        assert_eq!(
            manager.store.get_refresh_token().unwrap(),
            Some(pair.refresh.clone())
        );
    }

    #[test]
    fn test_adopt_pair_rejects_undecodable_access_token() {
        let manager = create_test_manager();
        let pair = TokenPair {
            access: "garbage".to_string(),
            refresh: "garbage".to_string(),
        };

        assert!(manager.adopt_pair(&pair).is_err());
        assert!(!manager.is_logged_in());
    }

    #[test]
    fn test_logout_unconditionally_clears() {
        let manager = create_test_manager();
        let pair = TokenPair {
            access: make_token(42, "maria", future_exp()),
            refresh: make_token(42, "maria", future_exp()),
        };
        manager.adopt_pair(&pair).unwrap();
        manager.context.set_profile(Some(serde_json::json!({"vendor_id": 2})));
        assert!(manager.is_logged_in());

        manager.logout().unwrap();
        assert!(!manager.is_logged_in());
        assert!(manager.context().identity().is_none());
        assert!(manager.context().profile().is_none());
        assert!(!manager.store.has_token_pair().unwrap());
    }

    #[test]
    fn test_logout_from_empty_state_is_ok() {
        let manager = create_test_manager();
        manager.logout().unwrap();
        assert!(!manager.is_logged_in());
    }

    #[tokio::test]
    async fn test_restore_with_no_cookies_leaves_session_empty() {
        let manager = create_test_manager();

        let restored = manager.restore_session().await.unwrap();
        assert!(!restored);
        assert!(!manager.is_logged_in());
        assert_eq!(manager.fsm_state(), SessionState::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_restore_with_one_cookie_leaves_session_empty() {
        // A jar holding only the access cookie, no refresh cookie.
        let jar = MemoryJar::new();
        let record = CookieRecord::token(&make_token(1, "u", future_exp()));
        jar.set("access_token", &serde_json::to_string(&record).unwrap())
            .unwrap();

        let manager = SessionManager::new(
            CredentialStore::new(Box::new(jar)),
            StorefrontClient::new("http://127.0.0.1:1/"),
            Arc::new(SessionContext::new()),
        );

        let restored = manager.restore_session().await.unwrap();
        assert!(!restored);
        assert!(!manager.is_logged_in());
    }

    #[tokio::test]
    async fn test_restore_round_trip_preserves_identity() {
        let manager = create_test_manager();

        // Simulate a successful login by adopting a pair, then rebuild the
        // session from the persisted cookies alone.
        let pair = TokenPair {
            access: make_token(42, "maria", future_exp()),
            refresh: make_token(42, "maria", future_exp()),
        };
        let original = manager.adopt_pair(&pair).unwrap();
        manager.context.set_identity(None);
        assert!(!manager.is_logged_in());

        let restored = manager.restore_session().await.unwrap();
        assert!(restored);
        assert_eq!(manager.context().identity().unwrap(), original);
        assert_eq!(manager.fsm_state(), SessionState::LoggedIn);
    }

    #[tokio::test]
    async fn test_restore_with_expired_access_and_failing_refresh_clears_session() {
        let manager = create_test_manager();
        let pair = TokenPair {
            access: make_token(42, "maria", past_exp()),
            refresh: make_token(42, "maria", future_exp()),
        };
        manager
            .store
            .set_token_pair(&pair.access, &pair.refresh)
            .unwrap();

        // The client points at an unroutable address, so the refresh fails
        // and must propagate as an unrecoverable restore failure.
        let result = manager.restore_session().await;
        assert!(result.is_err());
        assert!(!manager.is_logged_in());
        assert!(!manager.store.has_token_pair().unwrap());
        assert_eq!(manager.fsm_state(), SessionState::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_cold_refresh_success_adopts_new_pair() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let new_access = make_token(42, "maria", future_exp());
        let new_refresh = make_token(42, "maria", future_exp());

        // One-shot local server answering the refresh POST with a fresh pair.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = serde_json::json!({
            "access": new_access.clone(),
            "refresh": new_refresh.clone(),
        })
        .to_string();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        // A fresh manager whose only state is the stored cookies: the FSM
        // has never left NotLoggedIn when refresh() is called.
        let store = CredentialStore::new(Box::new(MemoryJar::new()));
        store
            .set_token_pair(
                &make_token(42, "maria", past_exp()),
                &make_token(42, "maria", future_exp()),
            )
            .unwrap();
        let manager = SessionManager::new(
            store,
            StorefrontClient::new(format!("http://{}/api/v1/", addr)),
            Arc::new(SessionContext::new()),
        );

        let pair = manager.refresh().await.unwrap();
        assert_eq!(pair.access, new_access);

        // A refresh that persisted and published must also report success.
        assert!(manager.is_logged_in());
        assert_eq!(manager.fsm_state(), SessionState::LoggedIn);
        assert_eq!(
            manager.store.get_access_token().unwrap(),
            Some(new_access)
        );
        assert_eq!(
            manager.store.get_refresh_token().unwrap(),
            Some(new_refresh)
        );

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_current_session() {
        let manager = create_test_manager();

        // Establish a session from stored cookies, then attempt a re-login
        // against the unroutable client.
        let pair = TokenPair {
            access: make_token(42, "maria", future_exp()),
            refresh: make_token(42, "maria", future_exp()),
        };
        manager.adopt_pair(&pair).unwrap();
        manager.restore_session().await.unwrap();
        assert_eq!(manager.fsm_state(), SessionState::LoggedIn);

        let result = manager.login("other@example.com", "pw").await;
        assert!(result.is_err());

        // The old session survives, and the FSM agrees.
        assert!(manager.is_logged_in());
        assert_eq!(manager.context().identity().unwrap().user_id, 42);
        assert_eq!(manager.fsm_state(), SessionState::LoggedIn);
        assert_eq!(
            manager.store.get_access_token().unwrap(),
            Some(pair.access.clone())
        );
    }

    #[tokio::test]
    async fn test_refresh_without_stored_token_errors() {
        let manager = create_test_manager();
        let result = manager.refresh().await;
        assert!(matches!(result, Err(SessionError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_login_transport_failure_returns_to_not_logged_in() {
        let manager = create_test_manager();

        let result = manager.login("a@example.com", "pw").await;
        assert!(result.is_err());
        assert!(!manager.is_logged_in());
        assert_eq!(manager.fsm_state(), SessionState::NotLoggedIn);
    }
}
