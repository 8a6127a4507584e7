//! Session error types.

use thiserror::Error;

/// Session error type.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Login rejected by the Storefront API
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Registration rejected by the Storefront API
    #[error("Registration failed: {0}")]
    Registration(String),

    /// Token refresh rejected or unreachable
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// Token could not be decoded (malformed payload, bad base64, missing claims)
    #[error("Token decode failed: {0}")]
    TokenDecode(String),

    /// Profile fetch rejected by the Storefront API
    #[error("Profile fetch failed: {0}")]
    ProfileFetch(String),

    /// Password reset rejected by the Storefront API
    #[error("Password reset failed: {0}")]
    PasswordReset(String),

    /// A required navigation parameter is absent
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// No session exists
    #[error("Not logged in")]
    NotLoggedIn,

    /// Invalid state transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] storefront_store::StorageError),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SessionError {
    /// The user-facing detail for this error, mirroring what the API sent
    /// where one was available.
    pub fn detail(&self) -> String {
        match self {
            SessionError::InvalidCredentials(d)
            | SessionError::Registration(d)
            | SessionError::TokenRefresh(d)
            | SessionError::ProfileFetch(d)
            | SessionError::PasswordReset(d) => d.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
