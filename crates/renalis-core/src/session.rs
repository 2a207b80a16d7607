//! # Session Module
//!
//! A Session couples the staging engine with a history backend.
//!
//! ## Storage Backends
//!
//! - `InMemory`: uses [`MemoryHistory`] (fast, volatile unless snapshotted)
//! - `Persistent`: uses [`RedbHistory`] for disk-backed ACID storage

use crate::history::{HistoryEntry, HistoryStore, MemoryHistory};
use crate::storage::RedbHistory;
use crate::trend::Trend;
use crate::{CkdError, MeasurementInput, PatientId, StageAssessor, StagingResult};
use std::path::Path;

/// Storage backend for a Session.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory history (fast, volatile).
    InMemory(MemoryHistory),
    /// Disk-backed history using redb (ACID, persistent).
    Persistent(RedbHistory),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryHistory::new())
    }
}

impl StorageBackend {
    fn store(&self) -> &dyn HistoryStore {
        match self {
            StorageBackend::InMemory(history) => history,
            StorageBackend::Persistent(redb) => redb,
        }
    }

    fn store_mut(&mut self) -> &mut dyn HistoryStore {
        match self {
            StorageBackend::InMemory(history) => history,
            StorageBackend::Persistent(redb) => redb,
        }
    }
}

/// High-level interface for staging measurements and tracking history.
///
/// Note: Session does NOT implement Clone (the redb handle cannot be cloned).
#[derive(Debug, Default)]
pub struct Session {
    backend: StorageBackend,
    assessor: StageAssessor,
}

impl Session {
    /// Create a new empty session with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing in-memory history.
    #[must_use]
    pub fn with_history(history: MemoryHistory) -> Self {
        Self {
            backend: StorageBackend::InMemory(history),
            assessor: StageAssessor::new(),
        }
    }

    /// Create a session with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CkdError> {
        let redb = RedbHistory::open(path)?;
        Ok(Self {
            backend: StorageBackend::Persistent(redb),
            assessor: StageAssessor::new(),
        })
    }

    /// Check if this session uses persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// Short backend label for status output.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            StorageBackend::InMemory(_) => "memory",
            StorageBackend::Persistent(_) => "redb",
        }
    }

    /// Stage a measurement without recording it.
    pub fn assess(&self, input: &MeasurementInput) -> Result<StagingResult, CkdError> {
        self.assessor.assess(input)
    }

    /// Stage a measurement and append the result to the patient's history.
    ///
    /// Nothing is appended when staging fails.
    pub fn record(
        &mut self,
        patient: PatientId,
        input: &MeasurementInput,
        recorded_at: u64,
    ) -> Result<(StagingResult, HistoryEntry), CkdError> {
        let result = self.assessor.assess(input)?;
        let entry = HistoryEntry::from_result(patient, recorded_at, *input, &result);
        self.backend.store_mut().append(entry)?;
        Ok((result, entry))
    }

    /// All entries of a patient, oldest first.
    pub fn history(&self, patient: PatientId) -> Result<Vec<HistoryEntry>, CkdError> {
        self.backend.store().entries(patient)
    }

    /// Most recent entry of a patient.
    pub fn latest(&self, patient: PatientId) -> Result<Option<HistoryEntry>, CkdError> {
        self.backend.store().latest(patient)
    }

    /// Trend between the patient's two most recent entries.
    pub fn trend(&self, patient: PatientId) -> Result<Trend, CkdError> {
        let entries = self.history(patient)?;
        Ok(Trend::from_entries(&entries))
    }

    /// Patients with at least one entry.
    pub fn patients(&self) -> Result<Vec<PatientId>, CkdError> {
        self.backend.store().patients()
    }

    /// Number of patients with history.
    pub fn patient_count(&self) -> Result<usize, CkdError> {
        Ok(self.patients()?.len())
    }

    /// Total number of history entries.
    pub fn entry_count(&self) -> Result<usize, CkdError> {
        self.backend.store().entry_count()
    }

    /// Copy the whole history into memory, regardless of backend.
    pub fn snapshot(&self) -> Result<MemoryHistory, CkdError> {
        match &self.backend {
            StorageBackend::InMemory(history) => Ok(history.clone()),
            StorageBackend::Persistent(redb) => {
                let mut snapshot = MemoryHistory::new();
                for patient in redb.patients()? {
                    for entry in redb.entries(patient)? {
                        snapshot.append(entry)?;
                    }
                }
                Ok(snapshot)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
