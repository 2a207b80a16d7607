//! # eGFR Estimation
//!
//! Creatinine-based eGFR estimate using a simplified, sex-specific power law
//! in the style of the CKD-EPI equation family:
//!
//! | Sex    | Creatinine   | eGFR                                         |
//! |--------|--------------|----------------------------------------------|
//! | female | `<= 0.7`     | `166 * (Cr/0.7)^-0.329 * 0.993^age`          |
//! | female | `> 0.7`      | `166 * (Cr/0.7)^-1.209 * 0.993^age`          |
//! | male   | `<= 0.9`     | `163 * (Cr/0.9)^-0.411 * 0.993^age`          |
//! | male   | `> 0.9`      | `163 * (Cr/0.9)^-1.209 * 0.993^age`          |
//!
//! The equation is an approximation: it carries no race term and has not been
//! checked against the full clinical CKD-EPI equation. The output is never
//! clamped; an extreme creatinine yields an extreme eGFR.

use crate::primitives::{
    AGE_FACTOR, CreatinineCoefficients, FEMALE_COEFFICIENTS, MALE_COEFFICIENTS, MAX_AGE_YEARS,
};
use crate::{CkdError, Sex};

/// Coefficients for the given sex.
#[must_use]
pub fn coefficients(sex: Sex) -> &'static CreatinineCoefficients {
    match sex {
        Sex::Female => &FEMALE_COEFFICIENTS,
        Sex::Male => &MALE_COEFFICIENTS,
    }
}

/// Exponent applied to `creatinine / kappa`.
///
/// The low branch is inclusive: a creatinine exactly at kappa uses `alpha_low`.
#[must_use]
pub fn creatinine_exponent(sex: Sex, creatinine: f64) -> f64 {
    let c = coefficients(sex);
    if creatinine <= c.kappa {
        c.alpha_low
    } else {
        c.alpha_high
    }
}

/// Unrounded eGFR estimate. Inputs are not validated.
#[must_use]
pub fn estimate_egfr_raw(creatinine: f64, age: u32, sex: Sex) -> f64 {
    let c = coefficients(sex);
    let exponent = creatinine_exponent(sex, creatinine);
    c.scale * (creatinine / c.kappa).powf(exponent) * AGE_FACTOR.powf(f64::from(age))
}

/// Estimate eGFR from creatinine, age and sex, rounded to the nearest integer.
///
/// # Errors
///
/// Returns `CkdError::InvalidMeasurement` when the creatinine is not a finite
/// positive number or the age is zero or above `MAX_AGE_YEARS`.
pub fn estimate_egfr(creatinine: f64, age: u32, sex: Sex) -> Result<f64, CkdError> {
    validate_creatinine(creatinine)?;
    validate_age(age)?;
    Ok(estimate_egfr_raw(creatinine, age, sex).round())
}

pub(crate) fn validate_creatinine(creatinine: f64) -> Result<(), CkdError> {
    if !creatinine.is_finite() {
        return Err(CkdError::InvalidMeasurement {
            field: "creatinine",
            value: creatinine,
            reason: "must be a finite number",
        });
    }
    if creatinine <= 0.0 {
        return Err(CkdError::InvalidMeasurement {
            field: "creatinine",
            value: creatinine,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

pub(crate) fn validate_age(age: u32) -> Result<(), CkdError> {
    if age == 0 {
        return Err(CkdError::InvalidMeasurement {
            field: "age",
            value: f64::from(age),
            reason: "must be greater than zero",
        });
    }
    if age > MAX_AGE_YEARS {
        return Err(CkdError::InvalidMeasurement {
            field: "age",
            value: f64::from(age),
            reason: "exceeds the plausible maximum",
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
