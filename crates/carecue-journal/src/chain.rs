//! Hashing and chain verification.
//!
//! Hash input, in order:
//!   1. session id (UTF-8)
//!   2. sequence (u64, little-endian)
//!   3. prev_hash (64 ASCII hex chars)
//!   4. the record as compact JSON

use sha2::{Digest, Sha256};

use carecue_contracts::{
    error::{CareError, CareResult},
    journal::JournalRecord,
};

use crate::event::{JournalEvent, GENESIS_HASH};

/// Lowercase hex SHA-256 of one chain link.
pub fn hash_entry(
    session_id: &str,
    sequence: u64,
    prev_hash: &str,
    record: &JournalRecord,
) -> CareResult<String> {
    let json = serde_json::to_vec(record).map_err(|e| CareError::JournalWriteFailed {
        reason: format!("record could not be encoded: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&json);
    Ok(hex::encode(hasher.finalize()))
}

/// True if every link points at its predecessor, every hash recomputes, and
/// sequence numbers run 0, 1, 2, … without gaps. An empty chain is valid.
pub fn verify_chain(events: &[JournalEvent]) -> bool {
    let mut expected_prev = GENESIS_HASH;

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }
        match hash_entry(&event.session_id, event.sequence, &event.prev_hash, &event.record) {
            Ok(hash) if hash == event.this_hash => {}
            _ => return false,
        }
        expected_prev = event.this_hash.as_str();
    }

    true
}
