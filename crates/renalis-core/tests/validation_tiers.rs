//! # Validation Tier Tests (T0-T3)
//!
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - T0: Input Validation
//! - T1: eGFR Estimation
//! - T2: Stage Classification and Table
//! - T3: End-to-End Staging

use renalis_core::{
    CkdError, CkdStage, MeasurementInput, STAGE_RECORDS, Sex, StageAssessor, assess, classify,
    estimate_egfr, stage_record,
};

// =============================================================================
// TIER T0: INPUT VALIDATION
// =============================================================================

mod t0_input_validation {
    use super::*;

    /// T0.1: Zero creatinine is rejected.
    #[test]
    fn zero_creatinine_rejected() {
        let input = MeasurementInput::creatinine(0.0, 50, Sex::Male);
        let result = StageAssessor::validate(&input);
        assert!(matches!(
            result,
            Err(CkdError::InvalidMeasurement {
                field: "creatinine",
                ..
            })
        ));
    }

    /// T0.2: Zero age is rejected.
    #[test]
    fn zero_age_rejected() {
        let input = MeasurementInput::creatinine(1.0, 0, Sex::Female);
        let result = StageAssessor::validate(&input);
        assert!(matches!(
            result,
            Err(CkdError::InvalidMeasurement { field: "age", .. })
        ));
    }

    /// T0.3: Negative direct eGFR is rejected rather than staged.
    #[test]
    fn negative_egfr_rejected() {
        let result = assess(&MeasurementInput::egfr(-5.0));
        assert!(matches!(
            result,
            Err(CkdError::InvalidMeasurement { field: "egfr", .. })
        ));
    }

    /// T0.4: Non-numeric values (NaN) are rejected on both branches.
    #[test]
    fn nan_rejected() {
        assert!(assess(&MeasurementInput::egfr(f64::NAN)).is_err());
        assert!(assess(&MeasurementInput::creatinine(f64::NAN, 40, Sex::Male)).is_err());
    }
}

// =============================================================================
// TIER T1: eGFR ESTIMATION
// =============================================================================

mod t1_estimation {
    use super::*;

    /// T1.1: Female reference value at kappa.
    #[test]
    fn female_at_kappa() {
        assert_eq!(estimate_egfr(0.7, 30, Sex::Female).expect("valid"), 134.0);
    }

    /// T1.2: Male at kappa uses the low-creatinine branch.
    #[test]
    fn male_at_kappa() {
        // 163 * 0.993^50 = 114.72
        assert_eq!(estimate_egfr(0.9, 50, Sex::Male).expect("valid"), 115.0);
        assert_eq!(
            renalis_core::estimation::creatinine_exponent(Sex::Male, 0.9),
            -0.411
        );
    }

    /// T1.3: Derivation is deterministic.
    #[test]
    fn deterministic() {
        let a = estimate_egfr(1.37, 58, Sex::Female).expect("valid");
        let b = estimate_egfr(1.37, 58, Sex::Female).expect("valid");
        assert_eq!(a.to_bits(), b.to_bits());
    }

    /// T1.4: Higher creatinine never raises the estimate.
    #[test]
    fn monotone_in_creatinine() {
        let mut last = f64::INFINITY;
        for tenths in 3..60 {
            let egfr = estimate_egfr(f64::from(tenths) / 10.0, 60, Sex::Male).expect("valid");
            assert!(egfr <= last);
            last = egfr;
        }
    }
}

// =============================================================================
// TIER T2: STAGE CLASSIFICATION AND TABLE
// =============================================================================

mod t2_classification {
    use super::*;

    /// T2.1: Boundary exactness.
    #[test]
    fn boundaries() {
        let cases = [
            (90.0, 1),
            (89.999, 2),
            (60.0, 2),
            (59.999, 3),
            (30.0, 3),
            (29.999, 4),
            (15.0, 4),
            (14.999, 5),
        ];
        for (egfr, expected) in cases {
            assert_eq!(classify(egfr).number(), expected, "eGFR {}", egfr);
        }
    }

    /// T2.2: The table holds exactly stages 1-5 with non-empty guidance.
    #[test]
    fn table_complete() {
        assert_eq!(STAGE_RECORDS.len(), 5);
        for stage in CkdStage::ALL {
            let record = stage_record(stage.number()).expect("record present");
            assert_eq!(record.stage, stage.number());
            assert!(!record.recommendations.diet.is_empty());
            assert!(!record.recommendations.lifestyle.is_empty());
            assert!(!record.recommendations.monitoring.is_empty());
        }
    }

    /// T2.3: Lookup outside 1-5 is a miss, not a default.
    #[test]
    fn lookup_miss() {
        assert!(stage_record(0).is_none());
        assert!(stage_record(6).is_none());
    }
}

// =============================================================================
// TIER T3: END-TO-END STAGING
// =============================================================================

mod t3_end_to_end {
    use super::*;

    /// T3.1: Direct eGFR 45 resolves to the stage 3 record.
    #[test]
    fn direct_egfr_45() {
        let result = assess(&MeasurementInput::egfr(45.0)).expect("valid");
        assert_eq!(result.egfr, 45.0);
        assert_eq!(result.stage.number(), 3);
        assert_eq!(result.record.name, "Moderate Reduction in Kidney Function");
        assert_eq!(result.record.egfr_range_label, "30-59");
    }

    /// T3.2: Creatinine path returns the eGFR it classified.
    #[test]
    fn creatinine_path() {
        let result = assess(&MeasurementInput::creatinine(0.7, 30, Sex::Female)).expect("valid");
        assert_eq!(result.egfr, 134.0);
        assert_eq!(result.stage, CkdStage::S1);
        assert_eq!(result.record.egfr_range_label, "90+");
    }

    /// T3.3: Severe creatinine lands in kidney failure.
    #[test]
    fn kidney_failure() {
        let result = assess(&MeasurementInput::creatinine(10.0, 80, Sex::Male)).expect("valid");
        assert_eq!(result.egfr, 5.0);
        assert_eq!(result.stage, CkdStage::S5);
        assert_eq!(result.record.name, "Kidney Failure");
    }
}
