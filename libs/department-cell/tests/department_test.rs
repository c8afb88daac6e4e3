mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use tokio_test::assert_ok;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::AnonymousAuthService;
use department_cell::{DepartmentError, DepartmentService, StoreDepartmentRepository};
use shared_database::SupabaseClient;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

use common::{service_for, service_with_auth, StaticAuth, TEST_TOKEN};

#[tokio::test]
async fn test_list_departments_normalizes_doctors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::department_response("cardiology", "Cardiology", json!([
                { "id": "doc-1", "name": "Dr. Jane Doe", "specialty": "Cardiologist" },
                { "name": "Dr. No Id" }
            ])),
            MockSupabaseResponses::department_response("neurology", "Neurology", json!([]))
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let departments = assert_ok!(service_for(&mock_server).list_departments().await);

    assert_eq!(departments.len(), 2);
    let cardiology = &departments[0];
    assert_eq!(cardiology.doctors.len(), 2);
    assert_eq!(cardiology.doctors[0].id, "doc-1");
    assert!(cardiology.doctors[1].id.starts_with("DR-"));
    assert!(cardiology.doctors.iter().all(|d| d.department_id == "cardiology"));
    assert_eq!(cardiology.photo_url.as_deref(), Some("/cardiology.jpg"));
}

#[tokio::test]
async fn test_doctors_by_department() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .and(query_param("id", "eq.cardiology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::department_response("cardiology", "Cardiology", json!([
                { "id": "doc-1", "name": "Dr. Jane Doe", "department_id": "stale" }
            ]))
        ])))
        .mount(&mock_server)
        .await;

    let doctors = service_for(&mock_server)
        .get_doctors_by_department("cardiology")
        .await
        .unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].name, "Dr. Jane Doe");
    assert_eq!(doctors[0].department_id, "cardiology");
}

#[tokio::test]
async fn test_missing_department_yields_no_doctors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let doctors = service_for(&mock_server)
        .get_doctors_by_department("unknown")
        .await
        .unwrap();

    assert!(doctors.is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_require_authentication() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .respond_with(ResponseTemplate::new(401)
            .set_body_json(MockSupabaseResponses::error_response("JWT expired", "PGRST301")))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).list_departments().await;

    assert_matches!(result, Err(DepartmentError::AuthenticationRequired(_)));
}

#[tokio::test]
async fn test_store_outage_is_query_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let result = service_for(&mock_server).list_departments().await;

    assert_matches!(result, Err(DepartmentError::QueryFailed(_)));
}

#[tokio::test]
async fn test_sign_in_failure_skips_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service_with_auth(&mock_server, StaticAuth { fail: true })
        .list_departments()
        .await;

    assert_matches!(result, Err(DepartmentError::AuthenticationRequired(_)));
}

#[tokio::test]
async fn test_rejected_token_is_replaced_on_next_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(MockSupabaseResponses::anonymous_signup_response("anon-dept")))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .respond_with(ResponseTemplate::new(403)
            .set_body_json(MockSupabaseResponses::error_response("permission denied", "42501")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    let service = DepartmentService::new(
        Arc::new(StoreDepartmentRepository::new(Arc::clone(&supabase))),
        Arc::new(AnonymousAuthService::new(supabase)),
    );

    assert_matches!(service.list_departments().await, Err(DepartmentError::AuthenticationRequired(_)));
    assert_ok!(service.list_departments().await);
}
