//! # Trend Assessment
//!
//! Compares a patient's two most recent history entries.
//!
//! | Condition                         | Direction          |
//! |-----------------------------------|--------------------|
//! | fewer than two entries            | `InsufficientData` |
//! | latest stage less severe          | `Improving`        |
//! | same stage                        | `Stable`           |
//! | latest stage more severe          | `Declining`        |

use crate::history::HistoryEntry;
use serde::{Deserialize, Serialize};

/// Direction of change between the two most recent stagings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

impl TrendDirection {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Stable => "stable",
            TrendDirection::Declining => "declining",
            TrendDirection::InsufficientData => "insufficient_data",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend between the latest and the previous staging of one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub latest: Option<HistoryEntry>,
    pub previous: Option<HistoryEntry>,
    /// `latest.egfr - previous.egfr`.
    pub egfr_change: Option<f64>,
    /// `latest.stage - previous.stage`; positive means more severe.
    pub stage_change: i8,
}

impl Trend {
    /// Compute the trend of chronologically ordered entries.
    #[must_use]
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let (previous, latest) = match entries {
            [] => return Self::insufficient(None),
            [only] => return Self::insufficient(Some(*only)),
            [.., previous, latest] => (*previous, *latest),
        };

        let stage_change = latest.stage.number() as i8 - previous.stage.number() as i8;
        let direction = match stage_change {
            d if d < 0 => TrendDirection::Improving,
            0 => TrendDirection::Stable,
            _ => TrendDirection::Declining,
        };

        Self {
            direction,
            latest: Some(latest),
            previous: Some(previous),
            egfr_change: Some(latest.egfr - previous.egfr),
            stage_change,
        }
    }

    fn insufficient(latest: Option<HistoryEntry>) -> Self {
        Self {
            direction: TrendDirection::InsufficientData,
            latest,
            previous: None,
            egfr_change: None,
            stage_change: 0,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
