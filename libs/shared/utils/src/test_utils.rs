use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub booking_api_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            booking_api_url: String::new(),
        }
    }
}

impl TestConfig {
    /// Points both the store and the notification endpoint at one mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            booking_api_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            booking_api_url: self.booking_api_url.clone(),
            status_refresh_seconds: 60,
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Unsigned token shaped like the provider's anonymous sessions.
    pub fn create_anonymous_token(user_id: &str, ttl_seconds: i64) -> String {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_seconds);

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user_id,
            "role": "authenticated",
            "is_anonymous": true,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode("test-signature");

        format!("{}.{}.{}", header_encoded, payload_encoded, signature_encoded)
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn anonymous_signup_response(user_id: &str) -> serde_json::Value {
        json!({
            "access_token": JwtTestUtils::create_anonymous_token(user_id, 3600),
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "test-refresh-token",
            "user": {
                "id": user_id,
                "email": null,
                "is_anonymous": true
            }
        })
    }

    pub fn booking_response(
        id: &str,
        doctor_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Test Patient",
            "email": "patient@example.com",
            "phone": "+1 555 0100",
            "dob": null,
            "department_id": "cardiology",
            "doctor_id": doctor_id,
            "doctor_name": "Dr. John Smith",
            "appointment_type": "consultation",
            "start_time": start_time.to_rfc3339(),
            "end_time": end_time.to_rfc3339(),
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn department_response(id: &str, name: &str, doctors: serde_json::Value) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("{} department", name),
            "created_at": "2024-01-01T00:00:00Z",
            "photo_url": format!("/{}.jpg", id),
            "doctors": doctors
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
