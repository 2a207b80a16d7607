//! # Stage Classification
//!
//! Maps an eGFR value onto one of the five CKD stages.
//!
//! ## Stage Definitions
//!
//! | Stage | eGFR band     |
//! |-------|---------------|
//! | S1    | `[90, inf)`   |
//! | S2    | `[60, 90)`    |
//! | S3    | `[30, 60)`    |
//! | S4    | `[15, 30)`    |
//! | S5    | `(-inf, 15)`  |
//!
//! Thresholds are tested from the highest down, so each boundary value
//! belongs to the less severe stage. The classifier is total: every `f64`,
//! including NaN and negatives, maps to a stage. Validation is the caller's job.

use super::records::{StageRecord, stage_record};
use crate::primitives::{STAGE_1_MIN_EGFR, STAGE_2_MIN_EGFR, STAGE_3_MIN_EGFR, STAGE_4_MIN_EGFR};
use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE ENUM
// =============================================================================

/// CKD stage, ordered from least to most severe.
///
/// Serialized as its stage number (1-5).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum CkdStage {
    S1,
    S2,
    S3,
    S4,
    S5,
}

impl CkdStage {
    /// All stages, least severe first.
    pub const ALL: [CkdStage; 5] = [
        CkdStage::S1,
        CkdStage::S2,
        CkdStage::S3,
        CkdStage::S4,
        CkdStage::S5,
    ];

    /// Stage number, 1 through 5.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            CkdStage::S1 => 1,
            CkdStage::S2 => 2,
            CkdStage::S3 => 3,
            CkdStage::S4 => 4,
            CkdStage::S5 => 5,
        }
    }

    /// Stage for a stage number, or `None` outside 1-5.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<CkdStage> {
        match number {
            1 => Some(CkdStage::S1),
            2 => Some(CkdStage::S2),
            3 => Some(CkdStage::S3),
            4 => Some(CkdStage::S4),
            5 => Some(CkdStage::S5),
            _ => None,
        }
    }

    /// Inclusive lower eGFR bound. `None` for S5, which is open below.
    #[must_use]
    pub const fn lower_bound(&self) -> Option<f64> {
        match self {
            CkdStage::S1 => Some(STAGE_1_MIN_EGFR),
            CkdStage::S2 => Some(STAGE_2_MIN_EGFR),
            CkdStage::S3 => Some(STAGE_3_MIN_EGFR),
            CkdStage::S4 => Some(STAGE_4_MIN_EGFR),
            CkdStage::S5 => None,
        }
    }

    /// Exclusive upper eGFR bound. `None` for S1, which is open above.
    #[must_use]
    pub const fn upper_bound(&self) -> Option<f64> {
        match self {
            CkdStage::S1 => None,
            CkdStage::S2 => Some(STAGE_1_MIN_EGFR),
            CkdStage::S3 => Some(STAGE_2_MIN_EGFR),
            CkdStage::S4 => Some(STAGE_3_MIN_EGFR),
            CkdStage::S5 => Some(STAGE_4_MIN_EGFR),
        }
    }

    /// Whether `egfr` falls inside this stage's band.
    #[must_use]
    pub fn contains(&self, egfr: f64) -> bool {
        let above_lower = self.lower_bound().is_none_or(|lo| egfr >= lo);
        let below_upper = self.upper_bound().is_none_or(|hi| egfr < hi);
        above_lower && below_upper
    }

    /// Check if this is kidney failure (S5).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, CkdStage::S5)
    }

    /// The static guidance record for this stage.
    #[must_use]
    pub fn record(&self) -> Option<&'static StageRecord> {
        stage_record(self.number())
    }

    /// Human-readable stage name, or an empty string if the table lacks it.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.record().map(|r| r.name).unwrap_or_default()
    }
}

impl std::fmt::Display for CkdStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.number(), self.name())
    }
}

impl From<CkdStage> for u8 {
    fn from(stage: CkdStage) -> Self {
        stage.number()
    }
}

impl TryFrom<u8> for CkdStage {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        CkdStage::from_number(number).ok_or_else(|| format!("no CKD stage {}", number))
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Classify an eGFR value.
///
/// Total over `f64`: NaN fails every comparison and lands in S5.
#[must_use]
pub fn classify(egfr: f64) -> CkdStage {
    if egfr >= STAGE_1_MIN_EGFR {
        CkdStage::S1
    } else if egfr >= STAGE_2_MIN_EGFR {
        CkdStage::S2
    } else if egfr >= STAGE_3_MIN_EGFR {
        CkdStage::S3
    } else if egfr >= STAGE_4_MIN_EGFR {
        CkdStage::S4
    } else {
        CkdStage::S5
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordering() {
        assert!(CkdStage::S1 < CkdStage::S2);
        assert!(CkdStage::S2 < CkdStage::S3);
        assert!(CkdStage::S3 < CkdStage::S4);
        assert!(CkdStage::S4 < CkdStage::S5);
    }

    #[test]
    fn boundary_values_belong_to_less_severe_stage() {
        assert_eq!(classify(90.0), CkdStage::S1);
        assert_eq!(classify(89.999), CkdStage::S2);
        assert_eq!(classify(60.0), CkdStage::S2);
        assert_eq!(classify(59.999), CkdStage::S3);
        assert_eq!(classify(30.0), CkdStage::S3);
        assert_eq!(classify(29.999), CkdStage::S4);
        assert_eq!(classify(15.0), CkdStage::S4);
        assert_eq!(classify(14.999), CkdStage::S5);
    }

    #[test]
    fn classifier_is_total() {
        assert_eq!(classify(-5.0), CkdStage::S5);
        assert_eq!(classify(f64::NEG_INFINITY), CkdStage::S5);
        assert_eq!(classify(f64::NAN), CkdStage::S5);
        assert_eq!(classify(1.0e9), CkdStage::S1);
        assert_eq!(classify(f64::INFINITY), CkdStage::S1);
    }

    #[test]
    fn number_round_trip() {
        for stage in CkdStage::ALL {
            assert_eq!(CkdStage::from_number(stage.number()), Some(stage));
        }
        assert_eq!(CkdStage::from_number(0), None);
        assert_eq!(CkdStage::from_number(6), None);
    }

    #[test]
    fn only_s5_is_terminal() {
        let terminal: Vec<CkdStage> = CkdStage::ALL
            .into_iter()
            .filter(CkdStage::is_terminal)
            .collect();
        assert_eq!(terminal, vec![CkdStage::S5]);
    }

    #[test]
    fn contains_matches_classify() {
        for egfr in [-1.0, 0.0, 14.999, 15.0, 29.5, 30.0, 45.0, 60.0, 89.0, 90.0, 200.0] {
            let stage = classify(egfr);
            assert!(stage.contains(egfr));
            let others = CkdStage::ALL.iter().filter(|s| **s != stage);
            for other in others {
                assert!(!other.contains(egfr));
            }
        }
    }

    #[test]
    fn stage_display() {
        assert_eq!(
            CkdStage::S3.to_string(),
            "Stage 3: Moderate Reduction in Kidney Function"
        );
        assert_eq!(CkdStage::S5.to_string(), "Stage 5: Kidney Failure");
    }
}
