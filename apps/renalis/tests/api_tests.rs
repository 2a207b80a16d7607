//! Integration tests for the Renalis HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use renalis::api::{
    AppState, ExportResponse, HealthResponse, HistoryResponse, RecordResponse, StageRecordJson,
    StageRecordResponse, StagingResponse, StatusResponse, TrendResponse, create_router,
};
use renalis::config::ServerConfig;
use renalis_core::{MeasurementInput, PatientId, Session, Sex, history_from_bytes};
use serde_json::json;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Config with rate limiting and authentication disabled.
fn open_config() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

fn server_with(session: Session, config: &ServerConfig) -> TestServer {
    TestServer::new(create_router(AppState::new(session), config)).unwrap()
}

/// Create a test server with a fresh in-memory session.
fn create_test_server() -> TestServer {
    server_with(Session::new(), &open_config())
}

/// Create a test server whose patient 7 has two recorded stagings.
fn create_populated_test_server() -> TestServer {
    let mut session = Session::new();
    session
        .record(PatientId(7), &MeasurementInput::egfr(72.0), 100)
        .unwrap();
    session
        .record(
            PatientId(7),
            &MeasurementInput::creatinine(1.5, 60, Sex::Male),
            200,
        )
        .unwrap();
    server_with(session, &open_config())
}

fn create_auth_test_server(api_key: &str) -> TestServer {
    let config = ServerConfig {
        api_key: Some(api_key.to_string()),
        ..open_config()
    };
    server_with(Session::new(), &config)
}

fn bearer(key: &str) -> HeaderValue {
    format!("Bearer {}", key).parse::<HeaderValue>().unwrap()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STAGE TABLE TESTS
// =============================================================================

#[tokio::test]
async fn test_stages_lists_five_records() {
    let server = create_test_server();

    let response = server.get("/stages").await;

    response.assert_status_ok();
    let stages: Vec<StageRecordJson> = response.json();
    assert_eq!(stages.len(), 5);
    assert_eq!(
        stages.iter().map(|s| s.stage).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert!(stages.iter().all(|s| !s.recommendations.diet.is_empty()));
}

#[tokio::test]
async fn test_stage_lookup() {
    let server = create_test_server();

    let response = server.get("/stages/5").await;

    response.assert_status_ok();
    let body: StageRecordResponse = response.json();
    let record = body.record.unwrap();
    assert_eq!(record.name, "Kidney Failure");
    assert_eq!(record.egfr_range_label, "<15");
}

#[tokio::test]
async fn test_stage_lookup_out_of_range() {
    let server = create_test_server();

    for stage in ["0", "6", "300", "-1"] {
        let response = server.get(&format!("/stages/{}", stage)).await;
        response.assert_status_not_found();
        let body: StageRecordResponse = response.json();
        assert!(!body.success);
        assert!(body.error.is_some());
    }
}

// =============================================================================
// ASSESS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_assess_direct_egfr() {
    let server = create_test_server();

    let response = server
        .post("/assess")
        .json(&json!({"type": "egfr", "egfr": 45}))
        .await;

    response.assert_status_ok();
    let result: StagingResponse = response.json();
    assert!(result.success);
    assert_eq!(result.stage, Some(3));
    assert_eq!(result.estimated, Some(false));
    let record = result.record.unwrap();
    assert_eq!(record.name, "Moderate Reduction in Kidney Function");
    assert_eq!(record.egfr_range_label, "30-59");
}

#[tokio::test]
async fn test_assess_from_creatinine() {
    let server = create_test_server();

    let response = server
        .post("/assess")
        .json(&json!({"type": "creatinine", "creatinine": 0.7, "age": 30, "sex": "female"}))
        .await;

    response.assert_status_ok();
    let result: StagingResponse = response.json();
    assert_eq!(result.egfr, Some(134.0));
    assert_eq!(result.estimated, Some(true));
    assert_eq!(result.stage, Some(1));
}

#[tokio::test]
async fn test_assess_rejects_invalid_values() {
    let server = create_test_server();

    let bodies = [
        json!({"type": "egfr", "egfr": -5}),
        json!({"type": "egfr", "egfr": 0}),
        json!({"type": "creatinine", "creatinine": 0, "age": 50, "sex": "male"}),
        json!({"type": "creatinine", "creatinine": 1.0, "age": 0, "sex": "male"}),
        json!({"type": "creatinine", "creatinine": 1.0, "age": -3, "sex": "male"}),
        json!({"type": "creatinine", "creatinine": 1.0, "age": 50, "sex": "unknown"}),
    ];

    for body in bodies {
        let response = server.post("/assess").json(&body).await;
        response.assert_status_bad_request();
        let result: StagingResponse = response.json();
        assert!(!result.success, "{} should be rejected", body);
        assert!(result.error.is_some());
        assert!(result.stage.is_none());
    }
}

#[tokio::test]
async fn test_assess_rejects_malformed_body() {
    let server = create_test_server();

    let response = server
        .post("/assess")
        .json(&json!({"type": "creatinine", "creatinine": 1.0}))
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// PATIENT HISTORY TESTS
// =============================================================================

#[tokio::test]
async fn test_record_then_list_history() {
    let server = create_test_server();

    let response = server
        .post("/patients/3/history")
        .json(&json!({"type": "egfr", "egfr": 52, "recorded_at": 1000}))
        .await;

    response.assert_status_ok();
    let recorded: RecordResponse = response.json();
    assert!(recorded.success);
    let entry = recorded.entry.unwrap();
    assert_eq!(entry.patient, 3);
    assert_eq!(entry.recorded_at, 1000);
    assert_eq!(entry.stage, 3);

    let response = server.get("/patients/3/history").await;
    response.assert_status_ok();
    let history: HistoryResponse = response.json();
    assert_eq!(history.patient, 3);
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0], entry);
}

#[tokio::test]
async fn test_record_invalid_appends_nothing() {
    let server = create_test_server();

    let response = server
        .post("/patients/3/history")
        .json(&json!({"type": "egfr", "egfr": -1}))
        .await;
    response.assert_status_bad_request();

    let history: HistoryResponse = server.get("/patients/3/history").await.json();
    assert!(history.entries.is_empty());
}

#[tokio::test]
async fn test_unknown_patient_has_empty_history() {
    let server = create_test_server();

    let response = server.get("/patients/999/history").await;

    response.assert_status_ok();
    let history: HistoryResponse = response.json();
    assert!(history.success);
    assert!(history.entries.is_empty());
}

#[tokio::test]
async fn test_history_is_chronological() {
    let server = create_test_server();

    for (at, egfr) in [(300, 40), (100, 80), (200, 60)] {
        server
            .post("/patients/1/history")
            .json(&json!({"type": "egfr", "egfr": egfr, "recorded_at": at}))
            .await
            .assert_status_ok();
    }

    let history: HistoryResponse = server.get("/patients/1/history").await.json();
    let times: Vec<u64> = history.entries.iter().map(|e| e.recorded_at).collect();
    assert_eq!(times, vec![100, 200, 300]);
}

// =============================================================================
// TREND ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_trend_declining() {
    let server = create_populated_test_server();

    let response = server.get("/patients/7/trend").await;

    response.assert_status_ok();
    let trend: TrendResponse = response.json();
    assert_eq!(trend.direction.as_deref(), Some("declining"));
    assert_eq!(trend.stage_change, 1);
    assert_eq!(trend.egfr_change, Some(58.0 - 72.0));
    assert_eq!(trend.previous.unwrap().recorded_at, 100);
    assert_eq!(trend.latest.unwrap().recorded_at, 200);
}

#[tokio::test]
async fn test_trend_insufficient_data() {
    let server = create_test_server();

    let trend: TrendResponse = server.get("/patients/42/trend").await.json();

    assert!(trend.success);
    assert_eq!(trend.direction.as_deref(), Some("insufficient_data"));
    assert!(trend.latest.is_none());
    assert!(trend.egfr_change.is_none());
}

// =============================================================================
// STATUS AND EXPORT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_counts() {
    let server = create_populated_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.backend, "memory");
    assert_eq!(status.patient_count, 1);
    assert_eq!(status.entry_count, 2);
}

#[tokio::test]
async fn test_export_snapshot_decodes() {
    use base64::Engine;

    let server = create_populated_test_server();

    let response = server.post("/export").await;

    response.assert_status_ok();
    let export: ExportResponse = response.json();
    assert!(export.success);
    assert_eq!(export.entry_count, Some(2));

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(export.data.unwrap())
        .unwrap();
    let history = history_from_bytes(&bytes).unwrap();
    assert_eq!(history.iter().count(), 2);
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_health_always_allowed() {
    let server = create_auth_test_server("k3y");

    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let server = create_auth_test_server("k3y");

    let response = server.get("/stages").await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_valid_bearer_accepted() {
    let server = create_auth_test_server("k3y");

    let response = server
        .get("/status")
        .add_header(axum::http::header::AUTHORIZATION, bearer("k3y"))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_wrong_key_rejected() {
    let server = create_auth_test_server("k3y");

    let response = server
        .get("/status")
        .add_header(axum::http::header::AUTHORIZATION, bearer("k3y-but-longer"))
        .await;

    assert_eq!(response.status_code().as_u16(), 401);
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let server = server_with(Session::new(), &config);

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    assert_eq!(response.status_code().as_u16(), 429);
}
