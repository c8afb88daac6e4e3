use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Authentication provider is not configured")]
    NotConfigured,

    #[error("Anonymous sign-in failed: {0}")]
    SignInFailed(String),
}
