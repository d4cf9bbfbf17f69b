//! The severity escalation guard.

use std::sync::Arc;

use tracing::{debug, info};

use carecue_contracts::{
    error::CareResult,
    journal::JournalEntry,
    settings::GuardSettings,
    severity::{clamp_severity, EscalationTier, SeverityState, SeverityTier},
    timer::TimerToken,
};
use carecue_core::{
    traits::{Clock, EscalationSurface, JournalWriter},
    Debouncer, JournalHandle,
};

/// Debounced, one-shot escalation over a severity reading.
///
/// Memory is a single value, `last_escalated_tier`. A settled reading fires
/// the surface only when its tier is above that memory; a settled `Normal`
/// reading clears it. Holding a high value steady therefore interrupts the
/// user once, and dropping back to Normal re-arms the guard.
pub struct SeverityEscalationGuard {
    clock: Arc<dyn Clock>,
    surface: Box<dyn EscalationSurface>,
    settings: GuardSettings,
    state: SeverityState,
    debouncer: Debouncer<u8>,
    journal: JournalHandle,
}

impl SeverityEscalationGuard {
    /// # Errors
    ///
    /// `ConfigError` if `settings` has a zero debounce window or thresholds
    /// outside `0 < elevated < critical <= 10`.
    pub fn new(
        clock: Arc<dyn Clock>,
        surface: Box<dyn EscalationSurface>,
        settings: GuardSettings,
    ) -> CareResult<Self> {
        settings.validate()?;
        Ok(Self {
            clock,
            surface,
            settings,
            state: SeverityState::default(),
            debouncer: Debouncer::new(settings.debounce_ms),
            journal: JournalHandle::detached(),
        })
    }

    pub fn with_journal(mut self, journal: Box<dyn JournalWriter>) -> Self {
        self.journal = JournalHandle::attached(journal);
        self
    }

    pub fn state(&self) -> &SeverityState {
        &self.state
    }

    pub fn tier(&self) -> SeverityTier {
        self.state.tier
    }

    pub fn current_value(&self) -> Option<u8> {
        self.state.current_value
    }

    pub fn last_escalated_tier(&self) -> Option<EscalationTier> {
        self.state.last_escalated_tier
    }

    pub fn settings(&self) -> &GuardSettings {
        &self.settings
    }

    /// True while a reported value is waiting for its window to close.
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Record a reading.
    ///
    /// Out-of-range input is clamped onto 0–10. The returned tier is the
    /// live classification for display; escalation is only evaluated once
    /// the debounce window closes.
    pub fn report(&mut self, value: i64) -> SeverityTier {
        let clamped = clamp_severity(value);
        let tier = self.settings.thresholds.classify(clamped);

        self.state.current_value = Some(clamped);
        self.state.tier = tier;
        let token = self.debouncer.push(self.clock.as_ref(), clamped);

        debug!(value, clamped, tier = %tier, token = %token, "severity reported");
        tier
    }

    /// Deliver a fired timer. Returns true if it closed this guard's window.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        match self.debouncer.on_timer(token) {
            Some(value) => {
                self.evaluate(value);
                true
            }
            None => false,
        }
    }

    /// Close the window now and evaluate the pending reading.
    ///
    /// Used by the form-submit path. Returns the tier that fired, if any.
    /// With nothing pending this does nothing, so a submit after the slider
    /// already settled cannot fire a second time.
    pub fn flush(&mut self) -> Option<EscalationTier> {
        let value = self.debouncer.flush(self.clock.as_ref())?;
        self.evaluate(value)
    }

    /// Start a fresh report: cancel the pending window and forget everything.
    pub fn reset(&mut self) {
        self.debouncer.cancel(self.clock.as_ref());
        self.state = SeverityState::default();
        debug!("severity guard reset");
    }

    fn evaluate(&mut self, value: u8) -> Option<EscalationTier> {
        let tier = self.settings.thresholds.classify(value);

        let Some(escalation) = tier.escalation() else {
            if self.state.last_escalated_tier.take().is_some() {
                self.journal.append(self.clock.now_ms(), JournalEntry::Deescalated { value });
                info!(value, "severity back to normal; escalation re-armed");
            }
            return None;
        };

        match self.state.last_escalated_tier {
            Some(last) if escalation <= last => {
                debug!(value, tier = %escalation, last = %last, "already escalated; no effect");
                None
            }
            _ => {
                self.state.last_escalated_tier = Some(escalation);
                self.surface.escalate(escalation, value);
                self.journal.append(
                    self.clock.now_ms(),
                    JournalEntry::Escalated { tier: escalation, value },
                );
                info!(value, tier = %escalation, "escalation fired");
                Some(escalation)
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
