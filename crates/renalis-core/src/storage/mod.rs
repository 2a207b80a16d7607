//! # Storage Module
//!
//! Persistent history backends.

mod redb_history;

pub use redb_history::RedbHistory;
