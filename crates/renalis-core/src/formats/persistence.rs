//! # Snapshot Format
//!
//! Binary serialization for complete staging histories. File I/O lives in
//! the app layer.
//!
//! Format: Header (5 bytes) + postcard-serialized [`MemoryHistory`].
//! - 4 bytes: Magic ("RNLS")
//! - 1 byte: Version
//!
//! Size and header are checked before the payload is deserialized.

use crate::history::{HistoryStore, MemoryHistory};
use crate::{CkdError, primitives};

/// Maximum accepted snapshot size (64 MB).
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024 * 1024;

/// Header length in bytes.
const HEADER_LEN: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes all history data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), CkdError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(CkdError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(CkdError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CkdError> {
        let Some(head) = bytes.get(..HEADER_LEN) else {
            return Err(CkdError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&head[0..4]);
        Ok(Self {
            magic,
            version: head[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a history to bytes (header + payload).
pub fn history_to_bytes(history: &MemoryHistory) -> Result<Vec<u8>, CkdError> {
    let payload = postcard::to_stdvec(history)
        .map_err(|e| CkdError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_LEN + payload.len());
    result.extend_from_slice(&SnapshotHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a history from bytes.
///
/// Checks, in order: maximum size, header. Only then is the payload decoded,
/// and it must consume every remaining byte. Decoded entries are re-appended so that grouping by patient and
/// chronological order hold even for hand-crafted snapshots.
pub fn history_from_bytes(bytes: &[u8]) -> Result<MemoryHistory, CkdError> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(CkdError::DeserializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let (decoded, rest): (MemoryHistory, &[u8]) = postcard::take_from_bytes(&bytes[HEADER_LEN..])
        .map_err(|e| {
            CkdError::DeserializationError(format!("Failed to decode history data: {}", e))
        })?;
    if !rest.is_empty() {
        return Err(CkdError::DeserializationError(format!(
            "{} trailing bytes after history data",
            rest.len()
        )));
    }

    let mut history = MemoryHistory::new();
    for entry in decoded.iter() {
        history.append(*entry)?;
    }
    Ok(history)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryEntry, HistoryStore};
    use crate::{MeasurementInput, PatientId, Sex, classify};

    fn sample_history() -> MemoryHistory {
        let mut history = MemoryHistory::new();
        for (patient, at, egfr) in [(1, 10, 95.0), (1, 20, 70.0), (4, 15, 22.0)] {
            history
                .append(HistoryEntry {
                    patient: PatientId(patient),
                    recorded_at: at,
                    egfr,
                    stage: classify(egfr),
                    measurement: MeasurementInput::egfr(egfr),
                })
                .expect("append");
        }
        history
            .append(HistoryEntry {
                patient: PatientId(4),
                recorded_at: 30,
                egfr: 23.0,
                stage: classify(23.0),
                measurement: MeasurementInput::creatinine(2.5, 60, Sex::Female),
            })
            .expect("append");
        history
    }

    #[test]
    fn header_roundtrip() {
        let bytes = SnapshotHeader::new().to_bytes();
        let restored = SnapshotHeader::from_bytes(&bytes).expect("parse header");
        assert_eq!(restored, SnapshotHeader::new());
    }

    #[test]
    fn snapshot_preserves_history() {
        let history = sample_history();
        let bytes = history_to_bytes(&history).expect("serialize");
        let restored = history_from_bytes(&bytes).expect("deserialize");
        assert_eq!(restored, history);
        assert_eq!(restored.entry_count().expect("count"), 4);
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = history_to_bytes(&sample_history()).expect("serialize");
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(history_from_bytes(&bytes).is_err());
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut bytes = history_to_bytes(&sample_history()).expect("serialize");
        bytes[4] = primitives::FORMAT_VERSION + 1;
        assert!(matches!(
            history_from_bytes(&bytes),
            Err(CkdError::DeserializationError(_))
        ));
    }

    #[test]
    fn truncated_input_rejected() {
        assert!(history_from_bytes(b"RNL").is_err());
        let bytes = history_to_bytes(&sample_history()).expect("serialize");
        assert!(history_from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = history_to_bytes(&sample_history()).expect("serialize");
        bytes.extend_from_slice(b"junk");
        assert!(matches!(
            history_from_bytes(&bytes),
            Err(CkdError::DeserializationError(msg)) if msg.contains("trailing")
        ));
    }

    #[test]
    fn empty_history_is_header_plus_length() {
        let bytes = history_to_bytes(&MemoryHistory::new()).expect("serialize");
        let restored = history_from_bytes(&bytes).expect("deserialize");
        assert!(restored.is_empty());
    }

    #[test]
    fn decoding_restores_ordering() {
        use std::collections::BTreeMap;

        let entry = |at: u64| HistoryEntry {
            patient: PatientId(1),
            recorded_at: at,
            egfr: 50.0,
            stage: classify(50.0),
            measurement: MeasurementInput::egfr(50.0),
        };
        // Same wire shape as MemoryHistory, but out of order and with an empty list.
        let mut raw: BTreeMap<PatientId, Vec<HistoryEntry>> = BTreeMap::new();
        raw.insert(PatientId(1), vec![entry(20), entry(10)]);
        raw.insert(PatientId(9), Vec::new());

        let mut bytes = SnapshotHeader::new().to_bytes().to_vec();
        bytes.extend(postcard::to_stdvec(&raw).expect("encode"));

        let history = history_from_bytes(&bytes).expect("decode");
        let times: Vec<u64> = history
            .entries(PatientId(1))
            .expect("entries")
            .iter()
            .map(|e| e.recorded_at)
            .collect();
        assert_eq!(times, vec![10, 20]);
        assert_eq!(history.patients().expect("patients"), vec![PatientId(1)]);
    }
}
