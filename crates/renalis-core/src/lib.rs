//! # renalis-core
//!
//! The CKD staging engine for Renalis - THE LOGIC.
//!
//! Converts a lab measurement (a direct eGFR, or serum creatinine + age + sex)
//! into a CKD stage 1-5 and the stage's guidance record (description, eGFR
//! band label, diet / lifestyle / monitoring recommendations).
//!
//! ## Data Flow
//!
//! ```text
//! MeasurementInput ──► estimation (creatinine only) ──► classify ──► stage_record
//!                                                                      │
//!                              Session::record ◄── StagingResult ◄─────┘
//!                                    │
//!                                    ▼
//!                          HistoryStore (memory | redb)
//! ```
//!
//! ## Architectural Constraints
//!
//! - The engine is pure: no I/O, no shared mutable state, trivially thread-safe
//! - The stage table is an immutable `static`
//! - Only the history stores hold state
//! - NO async, NO network dependencies

// =============================================================================
// MODULES
// =============================================================================

pub mod estimation;
pub mod formats;
pub mod history;
pub mod primitives;
pub mod session;
pub mod staging;
pub mod storage;
pub mod trend;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CkdError, MeasurementInput, PatientId, Sex};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use estimation::estimate_egfr;
pub use staging::{
    CkdStage, Recommendations, STAGE_RECORDS, StageAssessor, StageRecord, StagingResult, assess,
    classify, stage_record, stage_records,
};

// =============================================================================
// RE-EXPORTS: History
// =============================================================================

pub use formats::{SnapshotHeader, history_from_bytes, history_to_bytes};
pub use history::{HistoryEntry, HistoryStore, MemoryHistory};
pub use session::{Session, StorageBackend};
pub use storage::RedbHistory;
pub use trend::{Trend, TrendDirection};
