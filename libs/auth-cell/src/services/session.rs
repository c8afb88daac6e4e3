use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Method;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_database::supabase::SupabaseClient;
use shared_models::auth::{AuthTokenResponse, Session};
use shared_utils::jwt::{decode_claims, token_expiry};

use crate::models::AuthError;

/// Sessions expiring sooner than this are renewed before use.
const EXPIRY_MARGIN_SECONDS: i64 = 30;
const FALLBACK_SESSION_SECONDS: i64 = 3600;

/// Resolves the identity every store read and write runs under.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn ensure_authenticated(&self) -> Result<Session, AuthError>;

    /// Forgets the current session after the store rejected its token.
    async fn invalidate(&self) {}
}

/// Anonymous sign-in against the Supabase auth API, cached until near expiry.
pub struct AnonymousAuthService {
    supabase: Arc<SupabaseClient>,
    session: Mutex<Option<Session>>,
}

impl AnonymousAuthService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self {
            supabase,
            session: Mutex::new(None),
        }
    }

    async fn sign_in_anonymously(&self) -> Result<Session, AuthError> {
        if self.supabase.get_base_url().is_empty() {
            return Err(AuthError::NotConfigured);
        }

        debug!("Signing in anonymously");

        let response: AuthTokenResponse = self.supabase.request(
            Method::POST,
            "/auth/v1/signup",
            None,
            Some(json!({})),
        ).await.map_err(|e| {
            warn!("Anonymous sign-in failed: {}", e);
            AuthError::SignInFailed(e.to_string())
        })?;

        let session = session_from_response(response)?;
        info!("Anonymous session established for user {}", session.user_id);
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for AnonymousAuthService {
    async fn ensure_authenticated(&self) -> Result<Session, AuthError> {
        let mut cached = self.session.lock().await;

        if let Some(session) = cached.as_ref() {
            if session.is_valid_at(Utc::now(), EXPIRY_MARGIN_SECONDS) {
                return Ok(session.clone());
            }
            debug!("Cached session for {} is about to expire", session.user_id);
        }

        let session = self.sign_in_anonymously().await?;
        *cached = Some(session.clone());
        Ok(session)
    }

    async fn invalidate(&self) {
        let mut cached = self.session.lock().await;
        if let Some(session) = cached.take() {
            info!("Dropping rejected session for user {}", session.user_id);
        }
    }
}

fn session_from_response(response: AuthTokenResponse) -> Result<Session, AuthError> {
    let claims = decode_claims(&response.access_token).ok();

    let user_id = response
        .user
        .as_ref()
        .map(|user| user.id.clone())
        .or_else(|| claims.as_ref().map(|c| c.sub.clone()))
        .ok_or_else(|| AuthError::SignInFailed("Sign-in response carried no user".to_string()))?;

    let is_anonymous = response
        .user
        .as_ref()
        .map(|user| user.is_anonymous)
        .or_else(|| claims.as_ref().and_then(|c| c.is_anonymous))
        .unwrap_or(true);

    let expires_at = token_expiry(&response.access_token).unwrap_or_else(|| {
        Utc::now() + Duration::seconds(response.expires_in.unwrap_or(FALLBACK_SESSION_SECONDS))
    });

    Ok(Session {
        user_id,
        access_token: response.access_token,
        is_anonymous,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::auth::AuthUser;
    use shared_utils::test_utils::JwtTestUtils;

    fn response(token: String, user: Option<AuthUser>, expires_in: Option<i64>) -> AuthTokenResponse {
        AuthTokenResponse {
            access_token: token,
            token_type: Some("bearer".to_string()),
            expires_in,
            refresh_token: None,
            user,
        }
    }

    #[test]
    fn test_session_prefers_token_expiry() {
        let token = JwtTestUtils::create_anonymous_token("anon-1", 600);
        let session = session_from_response(response(token, None, Some(3600))).unwrap();

        let remaining = (session.expires_at - Utc::now()).num_seconds();
        assert!(remaining <= 600);
        assert_eq!(session.user_id, "anon-1");
        assert!(session.is_anonymous);
    }

    #[test]
    fn test_session_falls_back_to_expires_in() {
        let user = AuthUser { id: "anon-2".to_string(), email: None, is_anonymous: true };
        let session = session_from_response(response("opaque".to_string(), Some(user), Some(120))).unwrap();

        let remaining = (session.expires_at - Utc::now()).num_seconds();
        assert!(remaining > 100 && remaining <= 120);
        assert_eq!(session.user_id, "anon-2");
    }

    #[test]
    fn test_session_without_user_is_rejected() {
        let result = session_from_response(response("opaque".to_string(), None, None));
        assert!(matches!(result, Err(AuthError::SignInFailed(_))));
    }
}
