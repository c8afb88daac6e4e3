#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use wiremock::MockServer;

use auth_cell::{AuthError, AuthProvider};
use department_cell::{DepartmentService, StoreDepartmentRepository};
use shared_database::SupabaseClient;
use shared_models::auth::Session;
use shared_utils::test_utils::TestConfig;

pub const TEST_TOKEN: &str = "test-session-token";

pub struct StaticAuth {
    pub fail: bool,
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn ensure_authenticated(&self) -> Result<Session, AuthError> {
        if self.fail {
            return Err(AuthError::SignInFailed("sign-in disabled".to_string()));
        }
        Ok(Session {
            user_id: "anon-test".to_string(),
            access_token: TEST_TOKEN.to_string(),
            is_anonymous: true,
            expires_at: Utc::now() + Duration::hours(1),
        })
    }
}

pub fn service_for(server: &MockServer) -> Arc<DepartmentService> {
    service_with_auth(server, StaticAuth { fail: false })
}

pub fn service_with_auth(server: &MockServer, auth: StaticAuth) -> Arc<DepartmentService> {
    let config = TestConfig::with_mock_server(&server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    Arc::new(DepartmentService::new(
        Arc::new(StoreDepartmentRepository::new(supabase)),
        Arc::new(auth),
    ))
}
