//! Host glue for one patient session.
//!
//! `PatientSession` plays the role of the app shell: it owns the clock, one
//! sequencer, one severity guard (shared by the slider and the submit button),
//! and the session journal, and it routes every fired timer to both
//! controllers.

use std::sync::Arc;

use tracing::{debug, info};

use carecue_config::CareCueConfig;
use carecue_contracts::{
    error::CareResult,
    reminder::RespondOutcome,
    session::SessionId,
    severity::{EscalationTier, SeverityTier},
    timer::TimerToken,
};
use carecue_core::{
    traits::{Clock, JournalWriter},
    ManualClock,
};
use carecue_escalation::SeverityEscalationGuard;
use carecue_journal::{InMemoryJournal, JournalLog};
use carecue_reminder::ReminderSequencer;

use crate::surfaces::{RecordingEscalationSurface, RecordingPromptSurface, SurfaceLog};

/// One patient's check-in session on a simulated clock.
pub struct PatientSession {
    id: SessionId,
    config: CareCueConfig,
    clock: Arc<ManualClock>,
    sequencer: ReminderSequencer,
    guard: SeverityEscalationGuard,
    journal: Arc<InMemoryJournal>,
    surfaces: SurfaceLog,
}

impl PatientSession {
    /// Wire up a session from a validated configuration. The clock starts at 0.
    pub fn new(config: CareCueConfig) -> CareResult<Self> {
        let id = SessionId::new();
        let clock = Arc::new(ManualClock::new());
        let journal = Arc::new(InMemoryJournal::new(id.to_string()));
        let surfaces = SurfaceLog::new();

        let sequencer = ReminderSequencer::new(
            clock.clone(),
            Box::new(RecordingPromptSurface::new(surfaces.clone())),
            config.sequencer_settings(),
        )
        .with_journal(Box::new(Arc::clone(&journal)));

        let guard = SeverityEscalationGuard::new(
            clock.clone(),
            Box::new(RecordingEscalationSurface::new(surfaces.clone())),
            config.guard_settings(),
        )?
        .with_journal(Box::new(Arc::clone(&journal)));

        info!(session_id = %id, prompts = config.prompts.len(), "patient session opened");
        Ok(Self { id, config, clock, sequencer, guard, journal, surfaces })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &CareCueConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn sequencer(&self) -> &ReminderSequencer {
        &self.sequencer
    }

    pub fn guard(&self) -> &SeverityEscalationGuard {
        &self.guard
    }

    pub fn journal(&self) -> &InMemoryJournal {
        &self.journal
    }

    pub fn surfaces(&self) -> &SurfaceLog {
        &self.surfaces
    }

    // ── Check-ins ────────────────────────────────────────────────────────────

    /// Start the configured prompt queue.
    pub fn start_checkins(&mut self) -> CareResult<()> {
        let queue = self.config.prompt_queue()?;
        self.sequencer.start(queue)
    }

    pub fn respond(&mut self, option: &str) -> CareResult<RespondOutcome> {
        self.sequencer.respond(option)
    }

    /// Respond with the `n`th option (0-based) of the visible prompt.
    ///
    /// Out-of-range indexes are passed through as a label the prompt does
    /// not offer, so they come back as `Rejected`.
    pub fn respond_with_index(&mut self, n: usize) -> CareResult<RespondOutcome> {
        let label = self
            .sequencer
            .current_prompt()
            .and_then(|p| p.options.get(n).cloned())
            .unwrap_or_else(|| format!("option #{}", n + 1));
        self.sequencer.respond(&label)
    }

    pub fn dismiss(&mut self) -> CareResult<()> {
        self.sequencer.dismiss()
    }

    pub fn stop_checkins(&mut self) {
        self.sequencer.stop();
    }

    // ── Severity report form ─────────────────────────────────────────────────

    /// The slider moved.
    pub fn report_severity(&mut self, value: i64) -> SeverityTier {
        self.guard.report(value)
    }

    /// The report form was submitted.
    pub fn submit_report(&mut self) -> Option<EscalationTier> {
        self.guard.flush()
    }

    /// A blank report form was opened.
    pub fn new_report(&mut self) {
        self.guard.reset();
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Advance the clock by `delta_ms`, delivering every timer that falls
    /// due, including timers armed by those deliveries. Returns the number of
    /// timers delivered.
    pub fn run_for(&mut self, delta_ms: u64) -> usize {
        let deadline = self.clock.now_ms().saturating_add(delta_ms);
        let mut delivered = 0;

        while let Some(token) = self.clock.next_due(deadline) {
            self.deliver(token);
            delivered += 1;
        }

        self.clock.advance_to(deadline);
        delivered
    }

    /// Hand one fired token to both controllers. Returns true if either
    /// claimed it.
    pub fn deliver(&mut self, token: TimerToken) -> bool {
        let claimed_by_sequencer = self.sequencer.on_timer(token);
        let claimed_by_guard = self.guard.on_timer(token);
        if !(claimed_by_sequencer || claimed_by_guard) {
            debug!(token = %token, "timer fired with no owner");
        }
        claimed_by_sequencer || claimed_by_guard
    }

    /// Milliseconds until the next pending timer, if any.
    pub fn next_timer_in_ms(&self) -> Option<u64> {
        self.clock.next_deadline().map(|due| due.saturating_sub(self.clock.now_ms()))
    }

    /// Close the session: stop the sequence, drop any unsettled reading, and
    /// seal the journal. Returns the exported journal.
    pub fn end(&mut self) -> CareResult<JournalLog> {
        self.sequencer.stop();
        self.guard.reset();
        self.journal.finalize(&self.id.to_string())?;
        info!(session_id = %self.id, events = self.journal.len(), "patient session closed");
        Ok(self.journal.export_log())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use carecue_contracts::{
        reminder::SequencerPhase,
        severity::{EscalationTier, SeverityTier},
    };

    use super::PatientSession;
    use crate::mock_data::default_config;

    fn session() -> PatientSession {
        PatientSession::new(default_config().unwrap()).unwrap()
    }

    #[test]
    fn test_timers_reach_both_controllers() {
        let mut s = session();
        s.start_checkins().unwrap();
        s.report_severity(8);

        // Guard settles at 300 ms, first prompt at 20 s.
        assert_eq!(s.run_for(20_000), 2);
        assert_eq!(s.surfaces().escalations(), vec![(EscalationTier::Elevated, 8)]);
        assert_eq!(s.sequencer().phase(), SequencerPhase::Showing);
    }

    #[test]
    fn test_respond_with_index_maps_to_option_labels() {
        let mut s = session();
        s.start_checkins().unwrap();
        s.run_for(20_000);

        assert!(!s.respond_with_index(7).unwrap().is_accepted());
        assert!(s.respond_with_index(1).unwrap().is_accepted());
        assert_eq!(s.sequencer().state().response.as_deref(), Some("Not yet"));
    }

    #[test]
    fn test_next_timer_in_ms_tracks_pending_work() {
        let mut s = session();
        assert_eq!(s.next_timer_in_ms(), None);

        s.start_checkins().unwrap();
        s.run_for(5_000);
        assert_eq!(s.next_timer_in_ms(), Some(15_000));
    }

    #[test]
    fn test_submit_and_slider_share_one_guard() {
        let mut s = session();
        s.report_severity(9);
        assert_eq!(s.submit_report(), Some(EscalationTier::Critical));

        s.report_severity(9);
        s.run_for(300);
        assert_eq!(s.submit_report(), None);
        assert_eq!(s.surfaces().escalations().len(), 1);
        assert_eq!(s.guard().tier(), SeverityTier::Critical);
    }

    #[test]
    fn test_end_cancels_everything_and_seals_journal() {
        let mut s = session();
        s.start_checkins().unwrap();
        s.report_severity(9);
        s.run_for(20_000);

        let log = s.end().unwrap();

        assert_eq!(s.clock().pending_count(), 0);
        assert!(log.sealed);
        assert!(s.journal().verify_integrity());
        assert_eq!(log.count_kind("sequence_stopped"), 1);
        assert_eq!(log.count_kind("escalated"), 1);
    }
}
