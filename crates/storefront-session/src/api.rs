//! Storefront API REST client.
//!
//! This module provides the client for the external Storefront API:
//! - Token obtain/refresh (`user/token/`, `user/token/refresh/`)
//! - Registration (`user/register/`)
//! - Profile fetch (`user/profile/{user_id}/`)
//! - Password reset (`user/password-reset/{email}/`, `user/password-change/`)

use crate::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback shown when the API's error body carries no usable detail.
pub const GENERIC_ERROR_DETAIL: &str = "Something went wrong, please try again";

/// The credential pair returned by the token endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access: String,
    /// Longer-lived refresh token
    pub refresh: String,
}

/// Request body for the registration endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password2: String,
}

/// A user profile as returned by the profile endpoint.
///
/// Only the vendor fields are interpreted by this client; the complete
/// payload rides along in `raw` for the UI to render and for the session
/// to cache.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Whether this user holds the vendor role
    pub is_vendor: bool,
    /// Vendor ID; zero or negative means no vendor record
    pub vendor_id: i64,
    /// The complete raw payload
    pub raw: Value,
}

impl Profile {
    /// Interpret a raw profile payload, defaulting the vendor fields when
    /// absent.
    pub fn from_value(raw: Value) -> Self {
        let is_vendor = raw
            .get("is_vendor")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let vendor_id = raw.get("vendor_id").and_then(Value::as_i64).unwrap_or(0);
        Self {
            is_vendor,
            vendor_id,
            raw,
        }
    }
}

/// Validated parameters from a password-reset link.
///
/// A reset link missing either query parameter is rejected up front, before
/// any form submission can depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetLink {
    pub otp: String,
    pub uidb64: String,
}

impl ResetLink {
    /// Validate raw navigation parameters into a usable reset link.
    pub fn from_params(otp: Option<&str>, uidb64: Option<&str>) -> SessionResult<Self> {
        let otp = otp
            .filter(|v| !v.is_empty())
            .ok_or(SessionError::MissingParameter("otp"))?;
        let uidb64 = uidb64
            .filter(|v| !v.is_empty())
            .ok_or(SessionError::MissingParameter("uidb64"))?;

        Ok(Self {
            otp: otp.to_string(),
            uidb64: uidb64.to_string(),
        })
    }
}

/// Request body for the token refresh endpoint.
#[derive(Debug, Serialize)]
struct RefreshRequest {
    refresh: String,
}

/// Storefront API client.
#[derive(Clone)]
pub struct StorefrontClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Arguments
    /// * `api_base` - The API base URL, with or without a trailing slash
    ///   (e.g., `https://shop.example.com/api/v1/`)
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }
        Self {
            http_client: reqwest::Client::new(),
            api_base,
        }
    }

    /// Build the URL for an endpoint path.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Exchange email/password for a credential pair.
    pub async fn obtain_token(&self, email: &str, password: &str) -> SessionResult<TokenPair> {
        let url = self.endpoint_url("user/token/");

        tracing::debug!(url = %url, email = %email, "Requesting credential pair");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = Self::error_detail(response).await;
            tracing::warn!(status = %status, detail = %detail, "Login rejected");
            return Err(SessionError::InvalidCredentials(detail));
        }

        let pair: TokenPair = response.json().await?;
        Ok(pair)
    }

    /// Create a new account.
    ///
    /// Returns the created user payload on success.
    pub async fn register(&self, request: &RegistrationRequest) -> SessionResult<Value> {
        let url = self.endpoint_url("user/register/");

        tracing::debug!(url = %url, email = %request.email, "Registering account");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = Self::error_detail(response).await;
            tracing::warn!(status = %status, detail = %detail, "Registration rejected");
            return Err(SessionError::Registration(detail));
        }

        let created: Value = response.json().await?;
        Ok(created)
    }

    /// Exchange a refresh token for a new credential pair.
    pub async fn refresh_token(&self, refresh: &str) -> SessionResult<TokenPair> {
        let url = self.endpoint_url("user/token/refresh/");

        tracing::debug!(url = %url, "Refreshing credential pair");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&RefreshRequest {
                refresh: refresh.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = Self::error_detail(response).await;
            tracing::warn!(status = %status, detail = %detail, "Token refresh rejected");
            return Err(SessionError::TokenRefresh(detail));
        }

        let pair: TokenPair = response.json().await?;
        Ok(pair)
    }

    /// Fetch a user's profile.
    pub async fn fetch_profile(&self, user_id: u64) -> SessionResult<Profile> {
        let url = self.endpoint_url(&format!("user/profile/{}/", user_id));

        tracing::debug!(url = %url, user_id = user_id, "Fetching profile");

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = Self::error_detail(response).await;
            tracing::warn!(status = %status, detail = %detail, "Profile fetch rejected");
            return Err(SessionError::ProfileFetch(detail));
        }

        let raw: Value = response.json().await?;
        Ok(Profile::from_value(raw))
    }

    /// Ask the API to send a password-reset message to the given address.
    pub async fn request_password_reset(&self, email: &str) -> SessionResult<()> {
        let url = self.endpoint_url(&format!("user/password-reset/{}/", email));

        tracing::debug!(url = %url, "Requesting password reset");

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = Self::error_detail(response).await;
            tracing::warn!(status = %status, detail = %detail, "Password reset request rejected");
            return Err(SessionError::PasswordReset(detail));
        }

        Ok(())
    }

    /// Submit a new password for a validated reset link.
    pub async fn confirm_password_reset(
        &self,
        link: &ResetLink,
        password: &str,
    ) -> SessionResult<()> {
        let url = self.endpoint_url("user/password-change/");

        tracing::debug!(url = %url, "Submitting password change");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "otp": link.otp,
                "uidb64": link.uidb64,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = Self::error_detail(response).await;
            tracing::warn!(status = %status, detail = %detail, "Password change rejected");
            return Err(SessionError::PasswordReset(detail));
        }

        Ok(())
    }

    /// Pull the `detail` field out of an error body, falling back to the
    /// generic message when the body is absent or unparsable.
    async fn error_detail(response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        Self::detail_from_body(&body)
    }

    fn detail_from_body(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or_else(|| GENERIC_ERROR_DETAIL.to_string())
    }
}
