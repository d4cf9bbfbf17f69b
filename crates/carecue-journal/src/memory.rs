//! In-memory `JournalWriter`.
//!
//! Hosts keep an `Arc<InMemoryJournal>` and hand clones of it to the
//! sequencer and the guard, so both controllers append to one chain and the
//! host can still export or verify it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use carecue_contracts::{
    error::{CareError, CareResult},
    journal::JournalRecord,
};
use carecue_core::traits::JournalWriter;

use crate::{
    chain::{hash_entry, verify_chain},
    event::{JournalEvent, JournalLog, GENESIS_HASH},
};

pub(crate) struct ChainState {
    pub(crate) events: Vec<JournalEvent>,
    pub(crate) last_hash: String,
    pub(crate) sealed: bool,
}

/// Append-only journal for one session, chained with SHA-256.
pub struct InMemoryJournal {
    session_id: String,
    pub(crate) state: Mutex<ChainState>,
}

impl InMemoryJournal {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            state: Mutex::new(ChainState {
                events: Vec::new(),
                last_hash: GENESIS_HASH.to_string(),
                sealed: false,
            }),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    // Readers tolerate poisoning: the chain itself is only ever pushed to
    // after its hash is computed, so a panic elsewhere cannot leave it torn.
    fn read(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> CareResult<MutexGuard<'_, ChainState>> {
        self.state.lock().map_err(|e| CareError::JournalWriteFailed {
            reason: format!("journal lock poisoned: {}", e),
        })
    }

    pub fn len(&self) -> usize {
        self.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sealed(&self) -> bool {
        self.read().sealed
    }

    /// Copies of the most recent `n` records, oldest first.
    pub fn tail(&self, n: usize) -> Vec<JournalRecord> {
        let state = self.read();
        let start = state.events.len().saturating_sub(n);
        state.events[start..].iter().map(|e| e.record.clone()).collect()
    }

    pub fn export_log(&self) -> JournalLog {
        let state = self.read();
        JournalLog {
            session_id: self.session_id.clone(),
            events: state.events.clone(),
            sealed: state.sealed,
            exported_at: Utc::now(),
            terminal_hash: state.events.last().map(|e| e.this_hash.clone()).unwrap_or_default(),
        }
    }

    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().events)
    }
}

impl JournalWriter for InMemoryJournal {
    /// Hash and append `record`.
    ///
    /// Fails with `JournalWriteFailed` after `finalize`, or if the record
    /// cannot be encoded.
    fn write(&self, record: &JournalRecord) -> CareResult<()> {
        let mut state = self.write_lock()?;
        if state.sealed {
            return Err(CareError::JournalWriteFailed {
                reason: format!("journal for session {} is sealed", self.session_id),
            });
        }

        let sequence = state.events.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(&self.session_id, sequence, &prev_hash, record)?;

        debug!(sequence, kind = record.entry.kind(), "journal record appended");
        state.last_hash = this_hash.clone();
        state.events.push(JournalEvent {
            sequence,
            session_id: self.session_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash,
        });
        Ok(())
    }

    /// Seal the chain. Finalizing twice is harmless.
    fn finalize(&self, session_id: &str) -> CareResult<()> {
        let mut state = self.write_lock()?;
        if session_id != self.session_id {
            return Err(CareError::JournalWriteFailed {
                reason: format!(
                    "finalize for session {} called on the journal of {}",
                    session_id, self.session_id
                ),
            });
        }
        state.sealed = true;

        info!(
            session_id,
            events = state.events.len(),
            terminal_hash = %state.last_hash,
            "session journal sealed"
        );
        Ok(())
    }
}
