use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::AuthError;
use crate::services::session::AuthProvider;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            AuthError::SignInFailed(_) => AppError::Auth(err.to_string()),
        }
    }
}

/// Resolves (or reuses) the anonymous session and reports who we are.
pub async fn get_session(
    State(auth): State<Arc<dyn AuthProvider>>,
) -> Result<Json<Value>, AppError> {
    debug!("Resolving session");

    let session = auth.ensure_authenticated().await?;

    Ok(Json(json!({
        "authenticated": true,
        "session": session
    })))
}
