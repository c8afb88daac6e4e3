use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_anonymous: Option<bool>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

/// Resolved identity against the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub is_anonymous: bool,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// True when the session is still usable `margin_seconds` from `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin_seconds: i64) -> bool {
        now + chrono::Duration::seconds(margin_seconds) < self.expires_at
    }
}

/// Body returned by the auth provider's sign-up endpoint.
#[derive(Debug, Deserialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}
