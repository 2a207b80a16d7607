//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Error mapping: validation failures are 400, lookup misses 404 and
//! storage failures 500.

use super::{
    AppState,
    types::{
        ExportResponse, HealthResponse, HistoryResponse, MeasurementRequest, RecordRequest,
        RecordResponse, StageRecordJson, StageRecordResponse, StagingResponse, StatusResponse,
        TrendResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use renalis_core::{CkdError, PatientId, Session, history_to_bytes, stage_record, stage_records};

/// HTTP status for a core error.
fn error_status(err: &CkdError) -> StatusCode {
    if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if matches!(err, CkdError::StageNotFound(_)) {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STAGE TABLE HANDLERS
// =============================================================================

/// List all five stage records.
pub async fn stages_handler() -> impl IntoResponse {
    let records: Vec<StageRecordJson> = stage_records().iter().map(Into::into).collect();
    Json(records)
}

/// Look up one stage record.
pub async fn stage_handler(Path(stage): Path<i64>) -> impl IntoResponse {
    match u8::try_from(stage).ok().and_then(stage_record) {
        Some(record) => (StatusCode::OK, Json(StageRecordResponse::success(record))),
        None => (
            StatusCode::NOT_FOUND,
            Json(StageRecordResponse::error(format!(
                "Stage not found: {} (expected 1-5)",
                stage
            ))),
        ),
    }
}

// =============================================================================
// ASSESS HANDLER
// =============================================================================

/// Stage a measurement without recording it.
pub async fn assess_handler(
    State(state): State<AppState>,
    Json(request): Json<MeasurementRequest>,
) -> impl IntoResponse {
    let input = match request.to_measurement() {
        Ok(input) => input,
        Err(e) => {
            return (
                error_status(&e),
                Json(StagingResponse::error(format!("Invalid measurement: {}", e))),
            );
        }
    };

    let session = state.session.read().await;
    match session.assess(&input) {
        Ok(result) => (StatusCode::OK, Json(StagingResponse::success(&result))),
        Err(e) => (
            error_status(&e),
            Json(StagingResponse::error(format!("Staging failed: {}", e))),
        ),
    }
}

// =============================================================================
// PATIENT HANDLERS
// =============================================================================

/// Stage a measurement and append it to the patient's history.
pub async fn record_handler(
    State(state): State<AppState>,
    Path(patient): Path<u64>,
    Json(request): Json<RecordRequest>,
) -> impl IntoResponse {
    let input = match request.measurement.to_measurement() {
        Ok(input) => input,
        Err(e) => {
            return (
                error_status(&e),
                Json(RecordResponse::error(format!("Invalid measurement: {}", e))),
            );
        }
    };
    let recorded_at = request.recorded_at.unwrap_or_else(crate::unix_now);

    let mut session = state.session.write().await;
    match session.record(PatientId(patient), &input, recorded_at) {
        Ok((result, entry)) => {
            tracing::info!(
                patient,
                recorded_at,
                stage = entry.stage.number(),
                "Recorded staging"
            );
            (
                StatusCode::OK,
                Json(RecordResponse::success(&entry, &result)),
            )
        }
        Err(e) => (
            error_status(&e),
            Json(RecordResponse::error(format!("Record failed: {}", e))),
        ),
    }
}

/// List a patient's history. Unknown patients have an empty history.
pub async fn history_handler(
    State(state): State<AppState>,
    Path(patient): Path<u64>,
) -> impl IntoResponse {
    let patient = PatientId(patient);
    let session = state.session.read().await;
    match session.history(patient) {
        Ok(entries) => (
            StatusCode::OK,
            Json(HistoryResponse::success(patient, &entries)),
        ),
        Err(e) => (
            error_status(&e),
            Json(HistoryResponse::error(
                patient,
                format!("History failed: {}", e),
            )),
        ),
    }
}

/// Trend between the patient's two most recent stagings.
pub async fn trend_handler(
    State(state): State<AppState>,
    Path(patient): Path<u64>,
) -> impl IntoResponse {
    let patient = PatientId(patient);
    let session = state.session.read().await;
    match session.trend(patient) {
        Ok(trend) => (
            StatusCode::OK,
            Json(TrendResponse::success(patient, &trend)),
        ),
        Err(e) => (
            error_status(&e),
            Json(TrendResponse::error(patient, format!("Trend failed: {}", e))),
        ),
    }
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

fn history_counts(session: &Session) -> Result<(usize, usize), CkdError> {
    Ok((session.patient_count()?, session.entry_count()?))
}

/// Get history status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let backend = session.backend_name();

    match history_counts(&session) {
        Ok((patients, entries)) => (
            StatusCode::OK,
            Json(StatusResponse::success(backend, patients, entries)),
        ),
        Err(e) => (
            error_status(&e),
            Json(StatusResponse::error(backend, format!("Status failed: {}", e))),
        ),
    }
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Export the whole history as a base64 snapshot. Works with both backends.
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;

    let history = match session.snapshot() {
        Ok(h) => h,
        Err(e) => {
            return (
                error_status(&e),
                Json(ExportResponse::error(format!(
                    "Failed to build history snapshot: {}",
                    e
                ))),
            );
        }
    };

    match history_to_bytes(&history) {
        Ok(data) => (
            StatusCode::OK,
            Json(ExportResponse::success(data, history.iter().count())),
        ),
        Err(e) => (
            error_status(&e),
            Json(ExportResponse::error(format!("Export failed: {}", e))),
        ),
    }
}
