//! Cookie name constants.

/// Cookie names used by the storefront client
pub struct CookieKeys;

impl CookieKeys {
    /// Access token cookie
    pub const ACCESS_TOKEN: &'static str = "access_token";

    /// Refresh token cookie
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
}
