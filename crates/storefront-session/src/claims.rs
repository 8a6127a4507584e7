//! Token claim decoding and expiry detection.
//!
//! Tokens are opaque signed JWTs issued by the Storefront API. The client
//! never verifies the signature; it only decodes the payload segment to read
//! the identity claims, the same way a browser-side token decoder would.

use crate::{SessionError, SessionResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identity claims carried in every Storefront API token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub user_id: u64,
    /// Username
    pub username: String,
    /// Expiry as unix seconds
    pub exp: i64,
}

/// Decode the claims out of a token without verifying its signature.
pub fn decode_claims(token: &str) -> SessionResult<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments
        .next()
        .ok_or_else(|| SessionError::TokenDecode("empty token".to_string()))?;
    let payload = segments
        .next()
        .ok_or_else(|| SessionError::TokenDecode("token has no payload segment".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| SessionError::TokenDecode(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| SessionError::TokenDecode(format!("payload is not valid claims JSON: {}", e)))
}

/// Whether a token is expired per its `exp` claim.
///
/// Both sides of the comparison are unix seconds. A token that cannot be
/// decoded counts as expired, failing safe toward logout rather than
/// silently trusting a bad token.
pub fn is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp <= Utc::now().timestamp(),
        Err(_) => true,
    }
}
