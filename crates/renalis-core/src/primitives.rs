//! # Clinical Primitives
//!
//! Hardcoded constants for the Renalis staging engine.
//!
//! These are compiled into the binary and are immutable at runtime.
//!
//! ## Primitives
//!
//! 1. **Stage thresholds**: lower eGFR bound of stages 1-4 (stage 5 is open below).
//! 2. **Creatinine equation**: sex-specific coefficients of the simplified
//!    CKD-EPI style power law.
//! 3. **Validation limits**: plausibility bounds applied before estimation.

// =============================================================================
// STAGE THRESHOLDS (mL/min/1.73m²)
// =============================================================================

/// eGFR at or above this is stage 1.
pub const STAGE_1_MIN_EGFR: f64 = 90.0;

/// eGFR at or above this (and below stage 1) is stage 2.
pub const STAGE_2_MIN_EGFR: f64 = 60.0;

/// eGFR at or above this (and below stage 2) is stage 3.
pub const STAGE_3_MIN_EGFR: f64 = 30.0;

/// eGFR at or above this (and below stage 3) is stage 4. Anything lower is stage 5.
pub const STAGE_4_MIN_EGFR: f64 = 15.0;

/// Number of CKD stages.
pub const STAGE_COUNT: usize = 5;

// =============================================================================
// CREATININE EQUATION
// =============================================================================

/// Coefficients of the sex-specific creatinine equation:
///
/// `egfr = scale * (creatinine / kappa)^exponent * AGE_FACTOR^age`
///
/// where `exponent` is `alpha_low` when `creatinine <= kappa`, otherwise
/// `alpha_high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatinineCoefficients {
    pub scale: f64,
    pub kappa: f64,
    pub alpha_low: f64,
    pub alpha_high: f64,
}

pub const FEMALE_COEFFICIENTS: CreatinineCoefficients = CreatinineCoefficients {
    scale: 166.0,
    kappa: 0.7,
    alpha_low: -0.329,
    alpha_high: -1.209,
};

pub const MALE_COEFFICIENTS: CreatinineCoefficients = CreatinineCoefficients {
    scale: 163.0,
    kappa: 0.9,
    alpha_low: -0.411,
    alpha_high: -1.209,
};

/// Per-year age attenuation.
pub const AGE_FACTOR: f64 = 0.993;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Oldest accepted age in years.
///
/// Ages above this are treated as data-entry errors.
pub const MAX_AGE_YEARS: u32 = 150;

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the Renalis snapshot header.
pub const MAGIC_BYTES: &[u8; 4] = b"RNLS";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;
