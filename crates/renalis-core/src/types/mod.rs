//! # Core Type Definitions
//!
//! This module contains the core types shared by the staging engine and the
//! history stores:
//! - Identifiers (`PatientId`)
//! - Measurement input (`Sex`, `MeasurementInput`)
//! - Error types (`CkdError`)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque identifier for a patient whose staging history is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient-{}", self.0)
    }
}

// =============================================================================
// SEX
// =============================================================================

/// Biological sex, selecting the coefficients of the creatinine equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Lowercase label, as accepted by [`Sex::from_str`](std::str::FromStr).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sex {
    type Err = CkdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(CkdError::InvalidSex(s.to_string())),
        }
    }
}

// =============================================================================
// MEASUREMENT INPUT
// =============================================================================

/// A lab measurement the engine can stage.
///
/// Exactly one of the two shapes: a measured eGFR, or the creatinine triple
/// the eGFR is estimated from. A half-filled mixture cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasurementInput {
    /// eGFR in mL/min/1.73m², used as-is.
    DirectEgfr(f64),
    /// Serum creatinine (mg/dL), age (years) and sex.
    FromCreatinine { creatinine: f64, age: u32, sex: Sex },
}

impl MeasurementInput {
    /// Shorthand for a direct eGFR reading.
    #[must_use]
    pub const fn egfr(value: f64) -> Self {
        Self::DirectEgfr(value)
    }

    /// Shorthand for a creatinine-based measurement.
    #[must_use]
    pub const fn creatinine(creatinine: f64, age: u32, sex: Sex) -> Self {
        Self::FromCreatinine {
            creatinine,
            age,
            sex,
        }
    }

    /// Whether the eGFR has to be estimated.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::FromCreatinine { .. })
    }
}

impl fmt::Display for MeasurementInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectEgfr(egfr) => write!(f, "eGFR {}", egfr),
            Self::FromCreatinine {
                creatinine,
                age,
                sex,
            } => write!(f, "creatinine {} mg/dL, age {}, {}", creatinine, age, sex),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Renalis.
///
/// - No silent failures, no default stage on bad input
/// - Use `Result<T, CkdError>` for fallible operations
/// - The core never panics
#[derive(Debug, Error)]
pub enum CkdError {
    /// A measurement field is non-finite or outside its accepted range.
    #[error("Invalid measurement: {field} = {value} ({reason})")]
    InvalidMeasurement {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A sex label other than male/female was supplied.
    #[error("Invalid sex: {0:?} (expected \"male\" or \"female\")")]
    InvalidSex(String),

    /// A measurement could not be assembled from the supplied fields.
    #[error("Incomplete measurement: {0}")]
    IncompleteMeasurement(String),

    /// No stage record exists for this stage number.
    #[error("Stage not found: {0}")]
    StageNotFound(u8),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CkdError {
    /// True for errors caused by the caller's input rather than the system.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CkdError::InvalidMeasurement { .. }
                | CkdError::InvalidSex(_)
                | CkdError::IncompleteMeasurement(_)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
