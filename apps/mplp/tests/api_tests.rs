//! Integration tests for the MPLP HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use mplp::api::{
    AppState, CheckResponse, CompatResponse, DigestResponse, ErrorResponse, HealthResponse,
    ModuleListResponse, ModuleResponse, StatusResponse, TiersResponse, create_router,
};
use mplp_catalog::{
    ModuleName, ModuleStatus, SchemaCatalog, Tier, catalog_checksum, schema_source,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Mutex to serialize tests since some of them modify env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        clear_env();
    }
}

fn clear_env() {
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::remove_var("MPLP_API_KEY");
        std::env::remove_var("MPLP_RATE_LIMIT");
    }
}

fn lock_env() -> TestGuard {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    TestGuard { _guard: guard }
}

/// Create a test server over the embedded catalog.
/// Returns a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = lock_env();
    let router = create_router(AppState::embedded().unwrap());
    (TestServer::new(router).unwrap(), guard)
}

/// Create a test server with `MPLP_API_KEY` set.
fn create_auth_test_server(api_key: &str) -> (TestServer, TestGuard) {
    let guard = lock_env();
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("MPLP_API_KEY", api_key) };
    let router = create_router(AppState::embedded().unwrap());
    (TestServer::new(router).unwrap(), guard)
}

fn bearer(key: &str) -> HeaderValue {
    format!("Bearer {}", key).parse::<HeaderValue>().unwrap()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// MODULE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_modules_lists_every_module_in_order() {
    let (server, _guard) = create_test_server();

    let response = server.get("/modules").await;

    response.assert_status_ok();
    let list: ModuleListResponse = response.json();
    let names: Vec<ModuleName> = list.modules.iter().map(|m| m.name).collect();
    assert_eq!(names, ModuleName::ALL.to_vec());
    assert_eq!(list.counts.total, 10);

    let context = &list.modules[0];
    assert_eq!(context.status, ModuleStatus::ProductionReady);
    assert_eq!(
        context.schema_id,
        "https://mplp.dev/schemas/v1.0/mplp-context.json"
    );
}

#[tokio::test]
async fn test_module_summary() {
    let (server, _guard) = create_test_server();

    let response = server.get("/modules/role").await;

    response.assert_status_ok();
    let module: ModuleResponse = response.json();
    assert_eq!(module.name, ModuleName::Role);
    assert_eq!(module.status, ModuleStatus::EnterpriseStandard);
    assert_eq!(module.summary.protocol_version.as_deref(), Some("1.0.0"));
    assert!(module.summary.is_required("role_id"));
}

#[tokio::test]
async fn test_module_unknown_returns_404() {
    let (server, _guard) = create_test_server();

    let response = server.get("/modules/workflow").await;

    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("workflow"));
}

#[tokio::test]
async fn test_module_name_is_case_sensitive() {
    let (server, _guard) = create_test_server();

    let response = server.get("/modules/Context").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_module_schema_is_embedded_document() {
    let (server, _guard) = create_test_server();

    let response = server.get("/modules/trace/schema").await;

    response.assert_status_ok();
    let schema: Value = response.json();
    let expected: Value = serde_json::from_str(schema_source(ModuleName::Trace)).unwrap();
    assert_eq!(schema, expected);
}

#[tokio::test]
async fn test_module_schema_unknown_returns_404() {
    let (server, _guard) = create_test_server();

    let response = server.get("/modules/nope/schema").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_module_missing_from_partial_catalog_returns_404() {
    let guard = lock_env();
    let full = SchemaCatalog::load().unwrap();
    let mut schemas = BTreeMap::new();
    schemas.insert(
        ModuleName::Plan,
        full.get(ModuleName::Plan).unwrap().clone(),
    );
    let router = create_router(AppState::new(SchemaCatalog::from_schemas(schemas)));
    let server = TestServer::new(router).unwrap();

    server.get("/modules/plan").await.assert_status_ok();
    server.get("/modules/context").await.assert_status_not_found();
    drop(guard);
}

// =============================================================================
// STATUS & TIER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_known_module() {
    let (server, _guard) = create_test_server();

    let response = server.get("/status/collab").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.status, ModuleStatus::Pending);
    assert!(status.pending);
    assert!(!status.production_ready);
    assert!(!status.enterprise_standard);
}

#[tokio::test]
async fn test_status_unknown_name_is_not_an_error() {
    let (server, _guard) = create_test_server();

    let response = server.get("/status/orchestrator").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "unknown");
    assert_eq!(body["production_ready"], false);
    assert_eq!(body["enterprise_standard"], false);
    assert_eq!(body["pending"], false);
}

#[tokio::test]
async fn test_status_empty_name_is_unknown() {
    let (server, _guard) = create_test_server();

    let response = server.get("/status/").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.name, "");
    assert_eq!(status.status, ModuleStatus::Unknown);
    assert!(!status.production_ready && !status.enterprise_standard && !status.pending);
}

#[tokio::test]
async fn test_status_whitespace_name_is_unknown() {
    let (server, _guard) = create_test_server();

    let response = server.get("/status/%20").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.name, " ");
    assert_eq!(status.status, ModuleStatus::Unknown);
}

#[tokio::test]
async fn test_tiers_in_priority_order() {
    let (server, _guard) = create_test_server();

    let response = server.get("/tiers").await;

    response.assert_status_ok();
    let tiers: TiersResponse = response.json();
    let order: Vec<Tier> = tiers.tiers.iter().map(|t| t.tier).collect();
    assert_eq!(order, Tier::ALL.to_vec());
    assert_eq!(
        tiers.tiers[0].modules,
        vec![
            ModuleName::Context,
            ModuleName::Plan,
            ModuleName::Confirm,
            ModuleName::Trace
        ]
    );

    let raw: Value = server.get("/tiers").await.json();
    assert_eq!(raw["tiers"][1]["tier"], "enterprise-standard");
}

// =============================================================================
// CATALOG ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_schemas_flattened_array() {
    let (server, _guard) = create_test_server();

    let response = server.get("/schemas").await;

    response.assert_status_ok();
    let schemas: Vec<Value> = response.json();
    assert_eq!(schemas.len(), 10);
    assert_eq!(
        schemas[9]["$id"],
        "https://mplp.dev/schemas/v1.0/mplp-network.json"
    );
}

#[tokio::test]
async fn test_check_passes() {
    let (server, _guard) = create_test_server();

    let response = server.get("/check").await;

    response.assert_status_ok();
    let check: CheckResponse = response.json();
    assert!(check.passed);
    assert_eq!(check.errors, 0);
    assert_eq!(check.report.reports.len(), 10);
}

#[tokio::test]
async fn test_digest_matches_library_checksum() {
    let (server, _guard) = create_test_server();

    let response = server.get("/digest").await;

    response.assert_status_ok();
    let digest: DigestResponse = response.json();
    let catalog = SchemaCatalog::load().unwrap();
    assert_eq!(digest.checksum, catalog_checksum(&catalog));
    assert_eq!(digest.checksum_hex, format!("{:016x}", digest.checksum));
    assert_eq!(digest.algorithm, "blake3");
    assert_eq!(digest.hash.len(), 64);
    assert!(digest.hash.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// COMPAT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_compat_identical_schema() {
    let (server, _guard) = create_test_server();
    let source: Value = serde_json::from_str(schema_source(ModuleName::Confirm)).unwrap();

    let response = server.post("/compat/confirm").json(&source).await;

    response.assert_status_ok();
    let compat: CompatResponse = response.json();
    assert_eq!(compat.module, ModuleName::Confirm);
    assert!(compat.compatible);
    assert!(compat.report.changes.is_empty());
}

#[tokio::test]
async fn test_compat_removed_property_is_breaking() {
    let (server, _guard) = create_test_server();
    let mut source: Value = serde_json::from_str(schema_source(ModuleName::Dialog)).unwrap();
    source["properties"]["legacy_channel"] = json!({ "type": "string" });

    let response = server.post("/compat/dialog").json(&source).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["compatible"], false);
    assert_eq!(body["report"]["changes"][0]["kind"], "REMOVED_PROPERTY");
}

#[tokio::test]
async fn test_compat_unknown_module_returns_404() {
    let (server, _guard) = create_test_server();

    let response = server.post("/compat/workflow").json(&json!({})).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_compat_non_object_body_returns_400() {
    let (server, _guard) = create_test_server();

    let response = server.post("/compat/plan").json(&json!([1, 2, 3])).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compat_invalid_json_body() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/compat/plan")
        .bytes(bytes::Bytes::from("not valid json"))
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_compat_oversized_body_rejected() {
    let (server, _guard) = create_test_server();
    let padding = "x".repeat(mplp_catalog::MAX_SCHEMA_BYTES + 1);
    let body = format!("{{\"description\":\"{}\"}}", padding);

    let response = server
        .post("/compat/plan")
        .bytes(bytes::Bytes::from(body))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/unknown").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (server, _guard) = create_test_server();

    let response = server.post("/health").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let (server, _guard) = create_auth_test_server(api_key);

    let response = server
        .get("/modules")
        .add_header(axum::http::header::AUTHORIZATION, bearer(api_key))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_valid_raw_token() {
    let api_key = "test-raw-key-67890";
    let (server, _guard) = create_auth_test_server(api_key);

    let response = server
        .get("/tiers")
        .add_header(
            axum::http::header::AUTHORIZATION,
            api_key.parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let (server, _guard) = create_auth_test_server("correct-key");

    let response = server
        .get("/modules")
        .add_header(axum::http::header::AUTHORIZATION, bearer("wrong-key"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let (server, _guard) = create_auth_test_server("required-key");

    let response = server.get("/check").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_bearer_prefix_only_rejected() {
    let (server, _guard) = create_auth_test_server("actual-key");

    let response = server
        .get("/modules")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer ".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let (server, _guard) = create_auth_test_server("secret-key-for-bypass-test");

    let response = server.get("/health").await;

    response.assert_status_ok();
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let guard = lock_env();
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("MPLP_RATE_LIMIT", "1") };
    let server = TestServer::new(create_router(AppState::embedded().unwrap())).unwrap();

    server.get("/health").await.assert_status_ok();
    let second = server.get("/health").await;

    assert_eq!(second.status_code(), StatusCode::TOO_MANY_REQUESTS);
    drop(guard);
}

#[tokio::test]
async fn test_rate_limit_zero_disables_limiter() {
    let guard = lock_env();
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("MPLP_RATE_LIMIT", "0") };
    let server = TestServer::new(create_router(AppState::embedded().unwrap())).unwrap();

    for _ in 0..20 {
        server.get("/health").await.assert_status_ok();
    }
    drop(guard);
}
