//! Session journal records.
//!
//! Each decision a controller makes (a prompt shown, an answer recorded, an
//! escalation fired) produces exactly one `JournalRecord`. The journal writer
//! appends it; records are never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    prompt::PromptId,
    severity::EscalationTier,
};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    /// A prompt became visible.
    PromptShown { prompt_id: PromptId },
    /// A prompt was answered (`response` set) or dismissed (`None`).
    PromptAnswered {
        prompt_id: PromptId,
        response: Option<String>,
    },
    /// `respond()` was called with a label the prompt does not offer.
    PromptRejected { prompt_id: PromptId, option: String },
    /// The last prompt of the queue settled.
    SequenceComplete { answered: usize, dismissed: usize },
    /// The host stopped an active sequence.
    SequenceStopped { queue_index: Option<usize> },
    /// The escalation effect fired.
    Escalated { tier: EscalationTier, value: u8 },
    /// A settled Normal reading re-armed the guard after an escalation.
    Deescalated { value: u8 },
}

impl JournalEntry {
    /// Short discriminant used in logs and UI trails.
    pub fn kind(&self) -> &'static str {
        match self {
            JournalEntry::PromptShown { .. } => "prompt_shown",
            JournalEntry::PromptAnswered { .. } => "prompt_answered",
            JournalEntry::PromptRejected { .. } => "prompt_rejected",
            JournalEntry::SequenceComplete { .. } => "sequence_complete",
            JournalEntry::SequenceStopped { .. } => "sequence_stopped",
            JournalEntry::Escalated { .. } => "escalated",
            JournalEntry::Deescalated { .. } => "deescalated",
        }
    }
}

/// One immutable journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Monotonic clock reading when the decision was made.
    pub at_ms: u64,
    pub entry: JournalEntry,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl JournalRecord {
    pub fn new(at_ms: u64, entry: JournalEntry) -> Self {
        Self {
            at_ms,
            entry,
            timestamp: Utc::now(),
        }
    }
}
