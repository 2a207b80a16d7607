//! # redb-backed History Storage
//!
//! A disk-backed staging history using the redb embedded database:
//! - ACID transactions (one per append)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! ## Layout
//!
//! - `history`: `(patient_id, sequence)` -> postcard-encoded [`HistoryEntry`]
//! - `metadata`: `"next_sequence"` -> next free sequence number
//!
//! The sequence number is global and monotonic, so a range scan over one
//! patient yields that patient's entries in append order.

use crate::history::{HistoryEntry, HistoryStore, sort_chronologically};
use crate::{CkdError, PatientId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::collections::BTreeSet;
use std::path::Path;

/// Table for entries: (patient_id, sequence) -> serialized HistoryEntry bytes
const HISTORY: TableDefinition<(u64, u64), &[u8]> = TableDefinition::new("history");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_SEQUENCE_KEY: &str = "next_sequence";

fn io_err(e: impl std::fmt::Display) -> CkdError {
    CkdError::IoError(e.to_string())
}

/// A disk-backed history store using redb.
pub struct RedbHistory {
    db: Database,
    next_sequence: u64,
}

impl std::fmt::Debug for RedbHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbHistory")
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}

impl RedbHistory {
    /// Open or create a history database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CkdError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(HISTORY).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        let next_sequence = {
            let read_txn = db.begin_read().map_err(io_err)?;
            let table = read_txn.open_table(METADATA).map_err(io_err)?;
            table
                .get(NEXT_SEQUENCE_KEY)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0)
        };

        Ok(Self { db, next_sequence })
    }
}

impl HistoryStore for RedbHistory {
    fn append(&mut self, entry: HistoryEntry) -> Result<(), CkdError> {
        let bytes = postcard::to_allocvec(&entry)
            .map_err(|e| CkdError::SerializationError(e.to_string()))?;
        let sequence = self.next_sequence;
        let next = sequence.saturating_add(1);

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut history = write_txn.open_table(HISTORY).map_err(io_err)?;
            history
                .insert((entry.patient.0, sequence), bytes.as_slice())
                .map_err(io_err)?;
        }
        {
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            meta.insert(NEXT_SEQUENCE_KEY, next).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        // Only advance after a successful commit.
        self.next_sequence = next;
        Ok(())
    }

    fn entries(&self, patient: PatientId) -> Result<Vec<HistoryEntry>, CkdError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(HISTORY).map_err(io_err)?;

        let mut entries = Vec::new();
        for row in table
            .range((patient.0, 0u64)..=(patient.0, u64::MAX))
            .map_err(io_err)?
        {
            let (_key, value) = row.map_err(io_err)?;
            let entry: HistoryEntry = postcard::from_bytes(value.value())
                .map_err(|e| CkdError::DeserializationError(e.to_string()))?;
            entries.push(entry);
        }

        sort_chronologically(&mut entries);
        Ok(entries)
    }

    fn patients(&self) -> Result<Vec<PatientId>, CkdError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(HISTORY).map_err(io_err)?;

        let mut patients = BTreeSet::new();
        for row in table.iter().map_err(io_err)? {
            let (key, _value) = row.map_err(io_err)?;
            let (patient_id, _sequence) = key.value();
            patients.insert(PatientId(patient_id));
        }
        Ok(patients.into_iter().collect())
    }

    fn entry_count(&self) -> Result<usize, CkdError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(HISTORY).map_err(io_err)?;
        let count = table.len().map_err(io_err)?;
        Ok(count as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================
