//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use renalis_core::{
    CkdError, HistoryEntry, MeasurementInput, PatientId, Sex, StageRecord, StagingResult, Trend,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// MEASUREMENT REQUEST
// =============================================================================

/// A measurement as sent over HTTP.
///
/// ```json
/// {"type": "egfr", "egfr": 45}
/// {"type": "creatinine", "creatinine": 1.2, "age": 60, "sex": "male"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeasurementRequest {
    Egfr {
        egfr: f64,
    },
    Creatinine {
        creatinine: f64,
        /// Signed so that negative ages reach validation instead of failing
        /// JSON decoding.
        age: i64,
        sex: String,
    },
}

impl MeasurementRequest {
    /// Convert to a core measurement. Range checks on the values themselves
    /// are left to the staging engine.
    pub fn to_measurement(&self) -> Result<MeasurementInput, CkdError> {
        match self {
            MeasurementRequest::Egfr { egfr } => Ok(MeasurementInput::egfr(*egfr)),
            MeasurementRequest::Creatinine {
                creatinine,
                age,
                sex,
            } => {
                let age = u32::try_from(*age).map_err(|_| CkdError::InvalidMeasurement {
                    field: "age",
                    value: *age as f64,
                    reason: "must be a positive whole number of years",
                })?;
                let sex: Sex = sex.parse()?;
                Ok(MeasurementInput::creatinine(*creatinine, age, sex))
            }
        }
    }
}

impl From<MeasurementInput> for MeasurementRequest {
    fn from(input: MeasurementInput) -> Self {
        match input {
            MeasurementInput::DirectEgfr(egfr) => MeasurementRequest::Egfr { egfr },
            MeasurementInput::FromCreatinine {
                creatinine,
                age,
                sex,
            } => MeasurementRequest::Creatinine {
                creatinine,
                age: i64::from(age),
                sex: sex.as_str().to_string(),
            },
        }
    }
}

/// Request body of `POST /patients/{id}/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRequest {
    #[serde(flatten)]
    pub measurement: MeasurementRequest,
    /// Unix timestamp (seconds); the server clock is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<u64>,
}

// =============================================================================
// STAGE RECORDS
// =============================================================================

/// Recommendation lists of a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsJson {
    pub diet: Vec<String>,
    pub lifestyle: Vec<String>,
    pub monitoring: Vec<String>,
}

/// Stage record JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecordJson {
    pub stage: u8,
    pub name: String,
    pub egfr_range_label: String,
    pub description: String,
    pub recommendations: RecommendationsJson,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl From<&StageRecord> for StageRecordJson {
    fn from(record: &StageRecord) -> Self {
        Self {
            stage: record.stage,
            name: record.name.to_string(),
            egfr_range_label: record.egfr_range_label.to_string(),
            description: record.description.to_string(),
            recommendations: RecommendationsJson {
                diet: to_strings(record.recommendations.diet),
                lifestyle: to_strings(record.recommendations.lifestyle),
                monitoring: to_strings(record.recommendations.monitoring),
            },
        }
    }
}

/// Response of `GET /stages/{stage}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecordResponse {
    pub success: bool,
    pub record: Option<StageRecordJson>,
    pub error: Option<String>,
}

impl StageRecordResponse {
    pub fn success(record: &StageRecord) -> Self {
        Self {
            success: true,
            record: Some(record.into()),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            record: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// STAGING RESPONSE
// =============================================================================

/// Response of `POST /assess`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingResponse {
    pub success: bool,
    pub egfr: Option<f64>,
    pub estimated: Option<bool>,
    pub stage: Option<u8>,
    pub record: Option<StageRecordJson>,
    pub error: Option<String>,
}

impl StagingResponse {
    pub fn success(result: &StagingResult) -> Self {
        Self {
            success: true,
            egfr: Some(result.egfr),
            estimated: Some(result.estimated),
            stage: Some(result.stage.number()),
            record: Some(result.record.into()),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            egfr: None,
            estimated: None,
            stage: None,
            record: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// History entry JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntryJson {
    pub patient: u64,
    pub recorded_at: u64,
    pub egfr: f64,
    pub stage: u8,
    pub measurement: MeasurementRequest,
}

impl From<&HistoryEntry> for HistoryEntryJson {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            patient: entry.patient.0,
            recorded_at: entry.recorded_at,
            egfr: entry.egfr,
            stage: entry.stage.number(),
            measurement: entry.measurement.into(),
        }
    }
}

/// Response of `POST /patients/{id}/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    pub entry: Option<HistoryEntryJson>,
    pub record: Option<StageRecordJson>,
    pub error: Option<String>,
}

impl RecordResponse {
    pub fn success(entry: &HistoryEntry, result: &StagingResult) -> Self {
        Self {
            success: true,
            entry: Some(entry.into()),
            record: Some(result.record.into()),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            entry: None,
            record: None,
            error: Some(msg.into()),
        }
    }
}

/// Response of `GET /patients/{id}/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub patient: u64,
    pub entries: Vec<HistoryEntryJson>,
    pub error: Option<String>,
}

impl HistoryResponse {
    pub fn success(patient: PatientId, entries: &[HistoryEntry]) -> Self {
        Self {
            success: true,
            patient: patient.0,
            entries: entries.iter().map(HistoryEntryJson::from).collect(),
            error: None,
        }
    }

    pub fn error(patient: PatientId, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            patient: patient.0,
            entries: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TREND RESPONSE
// =============================================================================

/// Response of `GET /patients/{id}/trend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResponse {
    pub success: bool,
    pub patient: u64,
    /// improving, stable, declining or insufficient_data
    pub direction: Option<String>,
    pub latest: Option<HistoryEntryJson>,
    pub previous: Option<HistoryEntryJson>,
    pub egfr_change: Option<f64>,
    pub stage_change: i8,
    pub error: Option<String>,
}

impl TrendResponse {
    pub fn success(patient: PatientId, trend: &Trend) -> Self {
        Self {
            success: true,
            patient: patient.0,
            direction: Some(trend.direction.as_str().to_string()),
            latest: trend.latest.as_ref().map(HistoryEntryJson::from),
            previous: trend.previous.as_ref().map(HistoryEntryJson::from),
            egfr_change: trend.egfr_change,
            stage_change: trend.stage_change,
            error: None,
        }
    }

    pub fn error(patient: PatientId, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            patient: patient.0,
            direction: None,
            latest: None,
            previous: None,
            egfr_change: None,
            stage_change: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// History status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub backend: String,
    pub patient_count: usize,
    pub entry_count: usize,
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn success(backend: &str, patient_count: usize, entry_count: usize) -> Self {
        Self {
            success: true,
            backend: backend.to_string(),
            patient_count,
            entry_count,
            error: None,
        }
    }

    pub fn error(backend: &str, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            backend: backend.to_string(),
            patient_count: 0,
            entry_count: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EXPORT RESPONSE
// =============================================================================

/// Export response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded snapshot
    pub entry_count: Option<usize>,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(data: Vec<u8>, entry_count: usize) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                &data,
            )),
            entry_count: Some(entry_count),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            entry_count: None,
            error: Some(msg.into()),
        }
    }
}
