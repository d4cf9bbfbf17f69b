//! Reminder sequencer state and outcome types.
//!
//! `SequencerState` is the single mutable record the sequencer owns.
//! `RespondOutcome` is what `respond()` returns to the host: callers
//! pattern-match on it to tell an accepted answer from a rejected label.

use serde::{Deserialize, Serialize};

use crate::prompt::PromptId;

/// Lifecycle phase of a reminder sequence.
///
/// ```text
/// Idle ──start──▶ Waiting ──timer──▶ Showing ──respond/dismiss──▶ Responded
///  ▲                 ▲                                                │
///  │                 └──────────────── timer (more prompts) ──────────┤
///  └────────────────────────────────── timer (queue exhausted) ───────┘
/// ```
///
/// `stop()` returns to `Idle` from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencerPhase {
    /// Not started, finished, or stopped. No timer pending.
    Idle,
    /// A prompt timer is pending.
    Waiting,
    /// A prompt is visible. No timer pending.
    Showing,
    /// The visible prompt was answered or dismissed; the settle timer is pending.
    Responded,
}

impl SequencerPhase {
    /// True for the phases that own exactly one pending timer.
    pub fn has_pending_timer(self) -> bool {
        matches!(self, SequencerPhase::Waiting | SequencerPhase::Responded)
    }
}

impl std::fmt::Display for SequencerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SequencerPhase::Idle => "idle",
            SequencerPhase::Waiting => "waiting",
            SequencerPhase::Showing => "showing",
            SequencerPhase::Responded => "responded",
        };
        f.write_str(s)
    }
}

/// The sequencer's mutable record.
///
/// Invariants: `phase == Showing` implies `queue_index` is `Some(i)` with
/// `i < queue.len()`; `phase == Idle` implies `queue_index` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerState {
    pub phase: SequencerPhase,
    /// Cursor into the prompt queue. `None` when idle or finished.
    pub queue_index: Option<usize>,
    /// The last selected option label, or `None` after a dismissal.
    pub response: Option<String>,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            phase: SequencerPhase::Idle,
            queue_index: None,
            response: None,
        }
    }
}

/// What the user did with one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt_id: PromptId,
    /// The chosen label, or `None` if the prompt was dismissed.
    pub response: Option<String>,
}

/// The result of a `respond()` call made while a prompt is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespondOutcome {
    /// The option was recorded and the prompt is being hidden.
    Accepted { prompt_id: PromptId, option: String },
    /// The option is not one of the prompt's labels. Nothing changed; the
    /// caller may retry with a valid label.
    Rejected { prompt_id: PromptId, option: String },
}

impl RespondOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RespondOutcome::Accepted { .. })
    }
}
