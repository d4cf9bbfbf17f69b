//! Chained journal events and the sealed session log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carecue_contracts::journal::JournalRecord;

/// `prev_hash` of the first event in every chain: 64 hex zeros.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One link of a session's hash chain.
///
/// Changing any field, including the wrapped record, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEvent {
    /// Position in the chain, from 0.
    pub sequence: u64,
    pub session_id: String,
    pub record: JournalRecord,
    /// `this_hash` of the previous event, or `GENESIS_HASH`.
    pub prev_hash: String,
    /// Hex SHA-256 over this event, see `chain::hash_entry`.
    pub this_hash: String,
}

/// Every event of one session, exported in chain order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLog {
    pub session_id: String,
    pub events: Vec<JournalEvent>,
    /// True once the journal has been finalized; later writes are refused.
    pub sealed: bool,
    pub exported_at: DateTime<Utc>,
    /// `this_hash` of the last event; empty for an empty log.
    pub terminal_hash: String,
}

impl JournalLog {
    /// Count of events whose entry kind is `kind` (e.g. `"escalated"`).
    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.record.entry.kind() == kind).count()
    }
}
