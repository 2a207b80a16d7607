//! # Formats Module
//!
//! Serialization formats for history snapshots.

pub mod persistence;

pub use persistence::{SnapshotHeader, history_from_bytes, history_to_bytes};
