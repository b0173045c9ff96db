//! Integration tests for the API gateway.
//!
//! These tests run the full dispatch path against a mock HTTP server:
//! URL routing, header composition, envelope passthrough, and all three
//! 401 branches.
//!
//! ```bash
//! cargo test --test gateway_integration
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use talentgate::prelude::*;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(origin: &str) -> ApiGateway<InMemoryCredentialStore> {
    ApiGateway::new(GatewayConfig::new(origin), InMemoryCredentialStore::new()).unwrap()
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_post_resolves_with_envelope_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/orders/1/ship"))
        .and(header("Authorization", "Bearer token-1"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"carrier": "dhl"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 1, "status": "shipped"}
        })))
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());
    gw.session().set_token("token-1").await.unwrap();

    let envelope: ApiResponse<Value> = gw
        .post("/api/orders/1/ship", Some(&json!({"carrier": "dhl"})))
        .await
        .unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.data.unwrap()["status"], "shipped");
    assert!(envelope.error.is_none());
}

#[tokio::test]
async fn test_get_serializes_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/jobs"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "meta": {"page": 2, "limit": 20, "total": 95, "totalPages": 5}
        })))
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());

    let envelope: ApiResponse<Vec<Value>> = gw
        .get("/api/v2/jobs", Some(&[("page", "2"), ("limit", "20")]))
        .await
        .unwrap();

    assert!(envelope.success);
    assert_eq!(envelope.meta.unwrap().total_pages, 5);
}

#[tokio::test]
async fn test_delete_resolves_with_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/jobs/7"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"deleted": true}
        })))
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());

    let envelope: ApiResponse<Value> = gw.delete("/api/jobs/7").await.unwrap();
    assert!(envelope.success);
}

// ============================================================================
// Header composition
// ============================================================================

#[tokio::test]
async fn test_get_omits_content_type_and_auth_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/jobs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
        )
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());
    let _: ApiResponse<Vec<Value>> = gw.get("/api/v2/jobs", None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("Content-Type").is_none());
    assert!(requests[0].headers.get("Authorization").is_none());
}

#[tokio::test]
async fn test_bearer_header_present_with_legacy_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("Authorization", "Bearer legacy-tok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {}})),
        )
        .mount(&mock_server)
        .await;

    let store = InMemoryCredentialStore::new();
    let gw = ApiGateway::new(GatewayConfig::new(mock_server.uri()), store).unwrap();
    // Seed only the legacy key; the gateway must still pick it up.
    gw.session()
        .store()
        .set(talentgate::credentials::LEGACY_SESSION_TOKEN_KEY, "legacy-tok")
        .await
        .unwrap();

    let envelope: ApiResponse<Value> = gw.get("/api/profile", None).await.unwrap();
    assert!(envelope.success);
}

// ============================================================================
// URL routing
// ============================================================================

#[tokio::test]
async fn test_same_origin_path_bypasses_api_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {}})),
        )
        .mount(&mock_server)
        .await;

    // The API base points at a dead port; only origin routing can succeed.
    let config = GatewayConfig::new(mock_server.uri()).with_api_base_url("http://127.0.0.1:9");
    let gw = ApiGateway::new(config, InMemoryCredentialStore::new()).unwrap();

    let envelope: ApiResponse<Value> = gw
        .post(
            "/api/auth/forgot-password",
            Some(&json!({"email": "a@b.co"})),
        )
        .await
        .unwrap();

    assert!(envelope.success);
}

// ============================================================================
// 401 branches
// ============================================================================

#[tokio::test]
async fn test_auth_flow_401_passes_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "errors": [{"code": "INVALID_CREDENTIALS", "message": "Invalid email or password"}]
        })))
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);
    let gw = gateway(&mock_server.uri()).with_session_expired(move || {
        flag.store(true, Ordering::SeqCst);
    });
    gw.session().set_token("stale").await.unwrap();
    gw.set_current_page("/login");

    let err = gw
        .post::<Value, _>("/api/auth/login", Some(&json!({"email": "a@b.co"})))
        .await
        .unwrap_err();

    // Credential rejection reaches the form verbatim.
    assert_eq!(err.status, 401);
    assert_eq!(err.code.as_deref(), Some("INVALID_CREDENTIALS"));
    assert_eq!(err.message, "Invalid email or password");

    // No session invalidation on the auth flow.
    assert!(!expired.load(Ordering::SeqCst));
    assert_eq!(
        gw.session().token().await.unwrap(),
        Some("stale".to_string())
    );
}

#[tokio::test]
async fn test_public_endpoint_401_is_expected_absence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/jobs"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Not authenticated"
        })))
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);
    let gw = gateway(&mock_server.uri()).with_session_expired(move || {
        flag.store(true, Ordering::SeqCst);
    });
    gw.set_current_page("/jobs");

    let err = gw.get::<Value>("/api/v2/jobs", None).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!expired.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_public_page_shields_protected_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Not authenticated"
        })))
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);
    let gw = gateway(&mock_server.uri()).with_session_expired(move || {
        flag.store(true, Ordering::SeqCst);
    });
    gw.session().set_token("tok").await.unwrap();
    gw.set_current_page("/login");

    let err = gw.get::<Value>("/api/notifications", None).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!expired.load(Ordering::SeqCst));
    assert_eq!(gw.session().token().await.unwrap(), Some("tok".to_string()));
}

#[tokio::test]
async fn test_protected_401_clears_token_and_notifies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Session expired"
        })))
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);
    let gw = gateway(&mock_server.uri()).with_session_expired(move || {
        flag.store(true, Ordering::SeqCst);
    });
    gw.session().set_token("expired-tok").await.unwrap();
    gw.set_current_page("/dashboard");

    let err = gw
        .patch::<Value, _>("/api/profile", Some(&json!({"name": "New Name"})))
        .await
        .unwrap_err();

    // The error is still raised to the caller.
    assert_eq!(err.status, 401);
    assert_eq!(err.message, "Session expired");

    // Token cleared and the expiry strategy invoked.
    assert!(expired.load(Ordering::SeqCst));
    assert_eq!(gw.session().token().await.unwrap(), None);
}

#[tokio::test]
async fn test_protected_401_without_page_context_invalidates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/budgets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Session expired"
        })))
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);
    let gw = gateway(&mock_server.uri()).with_session_expired(move || {
        flag.store(true, Ordering::SeqCst);
    });
    gw.session().set_token("tok").await.unwrap();

    let err = gw.get::<Value>("/api/budgets", None).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(expired.load(Ordering::SeqCst));
    assert_eq!(gw.session().token().await.unwrap(), None);
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[tokio::test]
async fn test_validation_error_carries_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Validation failed",
            "errors": [{"code": "INVALID_EMAIL", "message": "Email is invalid", "field": "email"}]
        })))
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());

    let err = gw
        .post::<Value, _>("/api/auth/register", Some(&json!({"email": "nope"})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Validation);
    assert_eq!(err.code.as_deref(), Some("INVALID_EMAIL"));
    assert_eq!(err.field.as_deref(), Some("email"));
}

#[tokio::test]
async fn test_not_found_maps_to_kind() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/jobs/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Job not found"
        })))
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());
    gw.set_current_page("/dashboard");

    let err = gw.get::<Value>("/api/jobs/999", None).await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::NotFound);
    assert_eq!(err.message, "Job not found");
}

#[tokio::test]
async fn test_non_envelope_error_body_is_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let gw = gateway(&mock_server.uri());

    let err = gw.get::<Value>("/api/reports", None).await.unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Server);
    assert_eq!(err.message, "Bad Gateway");
    assert!(err.code.is_none());
}

#[tokio::test]
async fn test_transport_failure_is_status_zero() {
    // Nothing listens on the discard port.
    let gw = gateway("http://127.0.0.1:9");

    let err = gw.get::<Value>("/api/v2/jobs", None).await.unwrap_err();

    assert_eq!(err.status, 0);
    assert!(err.is_network());
}
