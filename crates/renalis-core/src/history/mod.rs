//! # Staging History
//!
//! Append-only, per-patient log of staging results.
//!
//! The [`HistoryStore`] trait abstracts over backends:
//! - [`MemoryHistory`]: in-memory `BTreeMap` (volatile unless snapshotted)
//! - [`RedbHistory`](crate::storage::RedbHistory): disk-backed, ACID
//!
//! ## Ordering
//!
//! Entries of a patient are returned ordered by `recorded_at` ascending.
//! Entries with equal timestamps keep their append order.

use crate::{CkdError, CkdStage, MeasurementInput, PatientId, StagingResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HISTORY ENTRY
// =============================================================================

/// One recorded staging result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub patient: PatientId,
    /// Unix timestamp (seconds) supplied by the caller.
    pub recorded_at: u64,
    pub egfr: f64,
    pub stage: CkdStage,
    /// The measurement the result was derived from.
    pub measurement: MeasurementInput,
}

impl HistoryEntry {
    /// Build an entry from a staging result.
    #[must_use]
    pub fn from_result(
        patient: PatientId,
        recorded_at: u64,
        measurement: MeasurementInput,
        result: &StagingResult,
    ) -> Self {
        Self {
            patient,
            recorded_at,
            egfr: result.egfr,
            stage: result.stage,
            measurement,
        }
    }
}

// =============================================================================
// HISTORY STORE TRAIT
// =============================================================================

/// Storage interface for staging history.
pub trait HistoryStore {
    /// Append an entry to its patient's history.
    fn append(&mut self, entry: HistoryEntry) -> Result<(), CkdError>;

    /// All entries of a patient. Unknown patients yield an empty list.
    fn entries(&self, patient: PatientId) -> Result<Vec<HistoryEntry>, CkdError>;

    /// Patients with at least one entry, ascending.
    fn patients(&self) -> Result<Vec<PatientId>, CkdError>;

    /// Total number of entries across all patients.
    fn entry_count(&self) -> Result<usize, CkdError>;

    /// Most recent entry of a patient.
    fn latest(&self, patient: PatientId) -> Result<Option<HistoryEntry>, CkdError> {
        Ok(self.entries(patient)?.last().copied())
    }
}

/// Stable sort by timestamp; preserves append order among equal timestamps.
pub(crate) fn sort_chronologically(entries: &mut [HistoryEntry]) {
    entries.sort_by_key(|e| e.recorded_at);
}

// =============================================================================
// IN-MEMORY HISTORY
// =============================================================================

/// In-memory history store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryHistory {
    patients: BTreeMap<PatientId, Vec<HistoryEntry>>,
}

impl MemoryHistory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Iterate over all entries, grouped by patient.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.patients.values().flatten()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&mut self, entry: HistoryEntry) -> Result<(), CkdError> {
        let list = self.patients.entry(entry.patient).or_default();
        // Insert after every entry with recorded_at <= ours to keep the list sorted.
        let at = list.partition_point(|e| e.recorded_at <= entry.recorded_at);
        list.insert(at, entry);
        Ok(())
    }

    fn entries(&self, patient: PatientId) -> Result<Vec<HistoryEntry>, CkdError> {
        Ok(self.patients.get(&patient).cloned().unwrap_or_default())
    }

    fn patients(&self) -> Result<Vec<PatientId>, CkdError> {
        Ok(self.patients.keys().copied().collect())
    }

    fn entry_count(&self) -> Result<usize, CkdError> {
        Ok(self.patients.values().map(Vec::len).sum())
    }

    fn latest(&self, patient: PatientId) -> Result<Option<HistoryEntry>, CkdError> {
        Ok(self.patients.get(&patient).and_then(|l| l.last().copied()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
