//! # Stage Assessor
//!
//! The end-to-end staging operation:
//!
//! 1. validate the measurement
//! 2. estimate eGFR from creatinine when no direct value was given
//! 3. classify the eGFR
//! 4. look up the stage record
//!
//! Pure and stateless. Recording a result is left to the caller
//! (see [`Session::record`](crate::Session::record)).

use super::records::{StageRecord, stage_record};
use super::stage::{CkdStage, classify};
use crate::estimation::{estimate_egfr, validate_age, validate_creatinine};
use crate::{CkdError, MeasurementInput};
use serde::Serialize;

/// Result of staging one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StagingResult {
    /// The eGFR the stage was derived from (estimated values are rounded).
    pub egfr: f64,
    /// Whether `egfr` was estimated from creatinine.
    pub estimated: bool,
    pub stage: CkdStage,
    pub record: &'static StageRecord,
}

/// Stage Assessor - validates and stages measurements.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageAssessor;

impl StageAssessor {
    /// Create a new assessor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a measurement without staging it.
    ///
    /// - direct eGFR: finite and greater than zero
    /// - creatinine: finite and greater than zero
    /// - age: greater than zero and no more than `MAX_AGE_YEARS`
    pub fn validate(input: &MeasurementInput) -> Result<(), CkdError> {
        match *input {
            MeasurementInput::DirectEgfr(egfr) => {
                if !egfr.is_finite() {
                    return Err(CkdError::InvalidMeasurement {
                        field: "egfr",
                        value: egfr,
                        reason: "must be a finite number",
                    });
                }
                if egfr <= 0.0 {
                    return Err(CkdError::InvalidMeasurement {
                        field: "egfr",
                        value: egfr,
                        reason: "must be greater than zero",
                    });
                }
                Ok(())
            }
            MeasurementInput::FromCreatinine {
                creatinine, age, ..
            } => {
                validate_creatinine(creatinine)?;
                validate_age(age)
            }
        }
    }

    /// The eGFR a valid measurement stands for.
    pub fn resolve_egfr(input: &MeasurementInput) -> Result<f64, CkdError> {
        Self::validate(input)?;
        match *input {
            MeasurementInput::DirectEgfr(egfr) => Ok(egfr),
            MeasurementInput::FromCreatinine {
                creatinine,
                age,
                sex,
            } => estimate_egfr(creatinine, age, sex),
        }
    }

    /// Stage a measurement.
    ///
    /// # Errors
    ///
    /// - `CkdError::InvalidMeasurement` if validation fails
    /// - `CkdError::StageNotFound` if the stage table has no record for the
    ///   classified stage
    pub fn assess(&self, input: &MeasurementInput) -> Result<StagingResult, CkdError> {
        let egfr = Self::resolve_egfr(input)?;
        let stage = classify(egfr);
        let record = stage_record(stage.number()).ok_or(CkdError::StageNotFound(stage.number()))?;

        Ok(StagingResult {
            egfr,
            estimated: input.is_derived(),
            stage,
            record,
        })
    }
}

/// Stage a measurement with the default assessor.
pub fn assess(input: &MeasurementInput) -> Result<StagingResult, CkdError> {
    StageAssessor::new().assess(input)
}

// =============================================================================
// TESTS
// =============================================================================
