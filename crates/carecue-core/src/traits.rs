//! Capability traits at the boundary between the controllers and their host.
//!
//! - `Clock`            : timer scheduling (platform timer, or `ManualClock` in tests)
//! - `PromptSurface`    : renders and hides the check-in modal
//! - `EscalationSurface`: surfaces the urgent-contact workflow
//! - `JournalWriter`    : append-only record of every decision
//!
//! The controllers own no platform code. Everything with a side effect goes
//! through one of these four traits, which is what lets the state machines be
//! driven deterministically in tests.

use std::sync::Arc;

use carecue_contracts::{
    error::CareResult,
    journal::JournalRecord,
    prompt::PromptDefinition,
    severity::EscalationTier,
    timer::TimerToken,
};

/// A monotonic timer source.
///
/// `schedule` never invokes anything itself: when a timer is due the host
/// delivers its token back to the owning controller (`on_timer`). This keeps
/// every state change on the caller's thread and makes cancellation a plain
/// bookkeeping operation.
pub trait Clock: Send + Sync {
    /// Milliseconds on the clock's own monotonic timeline.
    fn now_ms(&self) -> u64;

    /// Arm a timer that becomes due `delay_ms` from now.
    fn schedule(&self, delay_ms: u64) -> TimerToken;

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled. Must take effect before returning.
    fn cancel(&self, token: TimerToken) -> bool;
}

/// The host's check-in modal.
pub trait PromptSurface: Send + Sync {
    /// Display `prompt`. Never called while another prompt is visible.
    fn show_prompt(&self, prompt: &PromptDefinition);

    /// Hide the visible prompt. `confirmed` is true after an answer (the host
    /// shows its "thank you" confirmation) and false after a dismissal.
    fn hide_prompt(&self, confirmed: bool);
}

/// The host's urgent-contact workflow.
///
/// Mapping a tier to a phone number or chat channel is host configuration.
pub trait EscalationSurface: Send + Sync {
    /// Interrupt the user. `value` is the settled reading that caused it.
    fn escalate(&self, tier: EscalationTier, value: u8);
}

/// Append-only sink for journal records.
pub trait JournalWriter: Send + Sync {
    /// Append one record. Records are never modified afterwards.
    fn write(&self, record: &JournalRecord) -> CareResult<()>;

    /// Mark the session as finished. Implementations may seal the log here.
    fn finalize(&self, session_id: &str) -> CareResult<()>;
}

// ── Arc forwarding ───────────────────────────────────────────────────────────
//
// Lets a host hand `Box::new(Arc::clone(&handle))` to a controller and keep
// the other handle for inspection.

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
    fn schedule(&self, delay_ms: u64) -> TimerToken {
        (**self).schedule(delay_ms)
    }
    fn cancel(&self, token: TimerToken) -> bool {
        (**self).cancel(token)
    }
}

impl<T: PromptSurface + ?Sized> PromptSurface for Arc<T> {
    fn show_prompt(&self, prompt: &PromptDefinition) {
        (**self).show_prompt(prompt)
    }
    fn hide_prompt(&self, confirmed: bool) {
        (**self).hide_prompt(confirmed)
    }
}

impl<T: EscalationSurface + ?Sized> EscalationSurface for Arc<T> {
    fn escalate(&self, tier: EscalationTier, value: u8) {
        (**self).escalate(tier, value)
    }
}

impl<T: JournalWriter + ?Sized> JournalWriter for Arc<T> {
    fn write(&self, record: &JournalRecord) -> CareResult<()> {
        (**self).write(record)
    }
    fn finalize(&self, session_id: &str) -> CareResult<()> {
        (**self).finalize(session_id)
    }
}
