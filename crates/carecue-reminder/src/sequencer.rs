//! The reminder sequencer: one check-in prompt at a time, on a timer.
//!
//! Transition table:
//!
//!   start      Idle      → Waiting    arm initial delay of queue[0]
//!   timer      Waiting   → Showing    show_prompt(queue[i])
//!   respond    Showing   → Responded  hide_prompt(true),  arm settle delay
//!   dismiss    Showing   → Responded  hide_prompt(false), arm settle delay
//!   timer      Responded → Waiting    i += 1, arm inter-prompt delay
//!   timer      Responded → Idle       queue exhausted
//!   stop       any       → Idle       cancel timer
//!
//! The sequencer never sleeps. Each operation either acts immediately or arms
//! exactly one timer through its `TimerSlot`; the host delivers fired tokens
//! back through `on_timer`.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use carecue_contracts::{
    error::{CareError, CareResult},
    journal::JournalEntry,
    prompt::{PromptDefinition, PromptId},
    reminder::{PromptResponse, RespondOutcome, SequencerPhase, SequencerState},
    settings::SequencerSettings,
    timer::TimerToken,
};
use carecue_core::{
    traits::{Clock, JournalWriter, PromptSurface},
    JournalHandle, TimerSlot,
};

/// Presents a fixed queue of prompts over the lifetime of a session.
///
/// Construct one per session. The sequencer owns its state record and its
/// single timer; the clock and the prompt surface are supplied by the host.
pub struct ReminderSequencer {
    clock: Arc<dyn Clock>,
    surface: Box<dyn PromptSurface>,
    settings: SequencerSettings,
    queue: Vec<PromptDefinition>,
    state: SequencerState,
    slot: TimerSlot,
    responses: Vec<PromptResponse>,
    journal: JournalHandle,
}

impl ReminderSequencer {
    pub fn new(
        clock: Arc<dyn Clock>,
        surface: Box<dyn PromptSurface>,
        settings: SequencerSettings,
    ) -> Self {
        Self {
            clock,
            surface,
            settings,
            queue: Vec::new(),
            state: SequencerState::default(),
            slot: TimerSlot::new(),
            responses: Vec::new(),
            journal: JournalHandle::detached(),
        }
    }

    /// Record every decision to `journal`.
    pub fn with_journal(mut self, journal: Box<dyn JournalWriter>) -> Self {
        self.journal = JournalHandle::attached(journal);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn phase(&self) -> SequencerPhase {
        self.state.phase
    }

    pub fn queue_index(&self) -> Option<usize> {
        self.state.queue_index
    }

    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    pub fn queue(&self) -> &[PromptDefinition] {
        &self.queue
    }

    /// The prompt under the cursor (visible while `Showing`, upcoming while
    /// `Waiting`).
    pub fn current_prompt(&self) -> Option<&PromptDefinition> {
        self.state.queue_index.and_then(|i| self.queue.get(i))
    }

    /// One entry per prompt that was answered or dismissed since `start`.
    pub fn responses(&self) -> &[PromptResponse] {
        &self.responses
    }

    /// The timer this sequencer is waiting on, if any.
    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.slot.token()
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Begin presenting `queue`.
    ///
    /// An empty queue is a no-op and leaves the sequencer `Idle`. Starting
    /// while a sequence is active is an invalid transition; call `stop()`
    /// first.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when not `Idle`; `InvalidPrompt` when a definition
    /// is malformed or two prompts share an id.
    pub fn start(&mut self, queue: Vec<PromptDefinition>) -> CareResult<()> {
        if self.state.phase != SequencerPhase::Idle {
            warn!(phase = %self.state.phase, "start called on an active sequence");
            return Err(CareError::invalid_transition("start", self.state.phase));
        }

        let Some(first) = queue.first() else {
            debug!("start called with an empty queue; staying idle");
            return Ok(());
        };
        let initial_delay_ms = first.initial_delay_ms;

        let mut seen = HashSet::new();
        for prompt in &queue {
            prompt.validate()?;
            if !seen.insert(prompt.id.as_str()) {
                return Err(CareError::InvalidPrompt {
                    reason: format!("prompt id '{}' appears more than once in the queue", prompt.id),
                });
            }
        }

        self.queue = queue;
        self.responses.clear();
        self.state = SequencerState {
            phase: SequencerPhase::Waiting,
            queue_index: Some(0),
            response: None,
        };
        let token = self.slot.arm(self.clock.as_ref(), initial_delay_ms);

        info!(
            prompts = self.queue.len(),
            initial_delay_ms,
            token = %token,
            "reminder sequence started"
        );
        Ok(())
    }

    /// Deliver a fired timer.
    ///
    /// Returns true if the token belonged to this sequencer and caused a
    /// transition. Tokens arriving after `stop()`, or tokens armed by
    /// another controller on the same clock, are ignored.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.state.phase == SequencerPhase::Idle {
            return false;
        }
        if !self.slot.claim(token) {
            return false;
        }

        match self.state.phase {
            SequencerPhase::Waiting => self.show_current(),
            SequencerPhase::Responded => self.advance(),
            SequencerPhase::Idle | SequencerPhase::Showing => {
                // No timer is ever armed in these phases.
                warn!(phase = %self.state.phase, token = %token, "timer claimed in a phase without timers");
                return false;
            }
        }
        true
    }

    /// Answer the visible prompt with `option`.
    ///
    /// A label the prompt does not offer is rejected without touching state
    /// or calling the surface; the caller may retry.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless a prompt is `Showing`.
    pub fn respond(&mut self, option: &str) -> CareResult<RespondOutcome> {
        let index = self.require_showing("respond")?;
        let prompt = &self.queue[index];
        let prompt_id = prompt.id.clone();

        if !prompt.accepts(option) {
            warn!(prompt_id = %prompt_id, option, "response rejected: not one of the prompt's options");
            self.journal.append(
                self.clock.now_ms(),
                JournalEntry::PromptRejected { prompt_id: prompt_id.clone(), option: option.to_string() },
            );
            return Ok(RespondOutcome::Rejected { prompt_id, option: option.to_string() });
        }

        self.settle(index, Some(option.to_string()));
        self.surface.hide_prompt(true);

        info!(prompt_id = %prompt_id, option, "prompt answered");
        Ok(RespondOutcome::Accepted { prompt_id, option: option.to_string() })
    }

    /// Close the visible prompt without an answer.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless a prompt is `Showing`.
    pub fn dismiss(&mut self) -> CareResult<()> {
        let index = self.require_showing("dismiss")?;

        self.settle(index, None);
        self.surface.hide_prompt(false);

        info!(prompt_id = %self.queue[index].id, "prompt dismissed");
        Ok(())
    }

    /// Tear the sequence down.
    ///
    /// Cancels the pending timer before returning, so no stale delivery can
    /// revive the sequence. A visible prompt is hidden. Calling `stop()` on
    /// an idle sequencer does nothing.
    pub fn stop(&mut self) {
        if self.state.phase == SequencerPhase::Idle {
            return;
        }

        self.slot.disarm(self.clock.as_ref());
        if self.state.phase == SequencerPhase::Showing {
            self.surface.hide_prompt(false);
        }

        let queue_index = self.state.queue_index;
        self.state = SequencerState::default();
        self.journal.append(self.clock.now_ms(), JournalEntry::SequenceStopped { queue_index });
        info!(?queue_index, "reminder sequence stopped");
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    fn require_showing(&self, operation: &str) -> CareResult<usize> {
        match (self.state.phase, self.state.queue_index) {
            (SequencerPhase::Showing, Some(index)) if index < self.queue.len() => Ok(index),
            (phase, _) => {
                warn!(operation, phase = %phase, "operation requires a visible prompt");
                Err(CareError::invalid_transition(operation, phase))
            }
        }
    }

    /// Waiting → Showing.
    fn show_current(&mut self) {
        let Some(prompt) = self.state.queue_index.and_then(|i| self.queue.get(i)) else {
            warn!(queue_index = ?self.state.queue_index, "prompt timer fired with no prompt under the cursor");
            self.state = SequencerState::default();
            return;
        };

        self.state.phase = SequencerPhase::Showing;
        self.surface.show_prompt(prompt);
        self.journal.append(
            self.clock.now_ms(),
            JournalEntry::PromptShown { prompt_id: prompt.id.clone() },
        );
        info!(prompt_id = %prompt.id, queue_index = ?self.state.queue_index, "prompt shown");
    }

    /// Showing → Responded, recording `response` and arming the settle timer.
    fn settle(&mut self, index: usize, response: Option<String>) {
        let prompt_id: PromptId = self.queue[index].id.clone();

        self.state.phase = SequencerPhase::Responded;
        self.state.response = response.clone();
        self.responses.push(PromptResponse { prompt_id: prompt_id.clone(), response: response.clone() });

        let token = self.slot.arm(self.clock.as_ref(), self.settings.settle_delay_ms);
        self.journal.append(self.clock.now_ms(), JournalEntry::PromptAnswered { prompt_id, response });
        debug!(token = %token, settle_delay_ms = self.settings.settle_delay_ms, "settle timer armed");
    }

    /// Responded → Waiting (next prompt) or Idle (queue exhausted).
    fn advance(&mut self) {
        let next = self.state.queue_index.map_or(0, |i| i + 1);

        if next >= self.queue.len() {
            let answered = self.responses.iter().filter(|r| r.response.is_some()).count();
            let dismissed = self.responses.len() - answered;
            self.state.phase = SequencerPhase::Idle;
            self.state.queue_index = None;
            self.journal.append(
                self.clock.now_ms(),
                JournalEntry::SequenceComplete { answered, dismissed },
            );
            info!(answered, dismissed, "reminder sequence complete");
            return;
        }

        self.state.phase = SequencerPhase::Waiting;
        self.state.queue_index = Some(next);
        let token = self.slot.arm(self.clock.as_ref(), self.settings.inter_prompt_delay_ms);
        debug!(
            queue_index = next,
            token = %token,
            inter_prompt_delay_ms = self.settings.inter_prompt_delay_ms,
            "next prompt scheduled"
        );
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use carecue_contracts::{
        error::{CareError, CareResult},
        journal::{JournalEntry, JournalRecord},
        prompt::PromptDefinition,
        reminder::{RespondOutcome, SequencerPhase},
        settings::SequencerSettings,
    };
    use carecue_core::{
        traits::{Clock, JournalWriter, PromptSurface},
        ManualClock,
    };

    use super::ReminderSequencer;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SurfaceCall {
        Show(String),
        Hide(bool),
    }

    /// A prompt surface that records every call for later inspection.
    struct MockSurface {
        calls: Arc<Mutex<Vec<SurfaceCall>>>,
    }

    impl PromptSurface for MockSurface {
        fn show_prompt(&self, prompt: &PromptDefinition) {
            self.calls.lock().unwrap().push(SurfaceCall::Show(prompt.id.0.clone()));
        }

        fn hide_prompt(&self, confirmed: bool) {
            self.calls.lock().unwrap().push(SurfaceCall::Hide(confirmed));
        }
    }

    struct MockJournal {
        records: Arc<Mutex<Vec<JournalRecord>>>,
    }

    impl JournalWriter for MockJournal {
        fn write(&self, record: &JournalRecord) -> CareResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn finalize(&self, _session_id: &str) -> CareResult<()> {
            Ok(())
        }
    }

    struct Harness {
        clock: Arc<ManualClock>,
        sequencer: ReminderSequencer,
        calls: Arc<Mutex<Vec<SurfaceCall>>>,
        records: Arc<Mutex<Vec<JournalRecord>>>,
    }

    impl Harness {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new());
            let calls = Arc::new(Mutex::new(vec![]));
            let records = Arc::new(Mutex::new(vec![]));
            let sequencer = ReminderSequencer::new(
                clock.clone(),
                Box::new(MockSurface { calls: calls.clone() }),
                SequencerSettings::default(),
            )
            .with_journal(Box::new(MockJournal { records: records.clone() }));
            Self { clock, sequencer, calls, records }
        }

        /// Deliver every timer due within `delta_ms`, including timers armed
        /// by the deliveries themselves.
        fn run_for(&mut self, delta_ms: u64) {
            let deadline = self.clock.now_ms() + delta_ms;
            while let Some(token) = self.clock.next_due(deadline) {
                self.sequencer.on_timer(token);
            }
            self.clock.advance_to(deadline);
        }

        fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.lock().unwrap().clone()
        }

        fn shows(&self) -> usize {
            self.calls().iter().filter(|c| matches!(c, SurfaceCall::Show(_))).count()
        }

        /// Timer invariant: one pending timer in Waiting/Responded, none otherwise.
        fn assert_timer_invariant(&self) {
            let expected = usize::from(self.sequencer.phase().has_pending_timer());
            assert_eq!(
                self.clock.pending_count(),
                expected,
                "pending timers in phase {}",
                self.sequencer.phase()
            );
        }
    }

    fn prompt(id: &str, options: &[&str]) -> PromptDefinition {
        PromptDefinition::new(id, format!("{}?", id), options.iter().copied()).unwrap()
    }

    fn three_prompts() -> Vec<PromptDefinition> {
        vec![
            prompt("hydration", &["Yes", "Not yet"]),
            prompt("mood", &["Good", "Okay", "Unwell"]),
            prompt("medication", &["Taken", "Skipped"]),
        ]
    }

    // ── start ────────────────────────────────────────────────────────────────

    #[test]
    fn test_start_with_empty_queue_is_noop() {
        let mut h = Harness::new();
        h.sequencer.start(vec![]).unwrap();

        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.sequencer.queue_index(), None);
        assert_eq!(h.clock.pending_count(), 0);
    }

    #[test]
    fn test_first_prompt_waits_for_its_initial_delay() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        assert_eq!(h.sequencer.phase(), SequencerPhase::Waiting);
        assert_eq!(h.sequencer.queue_index(), Some(0));
        h.assert_timer_invariant();

        h.run_for(19_999);
        assert_eq!(h.shows(), 0, "no effect before the initial delay elapses");

        h.run_for(1);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Showing);
        assert_eq!(h.calls(), vec![SurfaceCall::Show("hydration".to_string())]);
        h.assert_timer_invariant();
    }

    #[test]
    fn test_start_uses_per_prompt_initial_delay() {
        let mut h = Harness::new();
        let queue = vec![prompt("pain", &["Yes", "No"]).with_initial_delay_ms(500)];
        h.sequencer.start(queue).unwrap();

        h.run_for(500);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Showing);
    }

    #[test]
    fn test_start_while_active_is_invalid_transition() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();

        match h.sequencer.start(three_prompts()) {
            Err(CareError::InvalidTransition { operation, phase }) => {
                assert_eq!(operation, "start");
                assert_eq!(phase, "waiting");
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
        h.assert_timer_invariant();
    }

    #[test]
    fn test_start_rejects_duplicate_prompt_ids() {
        let mut h = Harness::new();
        let queue = vec![prompt("mood", &["A"]), prompt("mood", &["B"])];

        assert!(matches!(h.sequencer.start(queue), Err(CareError::InvalidPrompt { .. })));
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.clock.pending_count(), 0);
    }

    // ── respond / dismiss ────────────────────────────────────────────────────

    #[test]
    fn test_respond_records_answer_and_schedules_next_prompt() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        h.run_for(20_000);

        let outcome = h.sequencer.respond("Yes").unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(h.sequencer.phase(), SequencerPhase::Responded);
        assert_eq!(h.sequencer.state().response.as_deref(), Some("Yes"));
        assert_eq!(h.calls().last(), Some(&SurfaceCall::Hide(true)));
        h.assert_timer_invariant();

        // Settle window, then the inter-prompt wait.
        h.run_for(1_200);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Waiting);
        assert_eq!(h.sequencer.queue_index(), Some(1));
        h.assert_timer_invariant();

        h.run_for(89_999);
        assert_eq!(h.shows(), 1);
        h.run_for(1);
        assert_eq!(h.calls().last(), Some(&SurfaceCall::Show("mood".to_string())));
    }

    #[test]
    fn test_invalid_option_is_rejected_without_effect() {
        let mut h = Harness::new();
        h.sequencer.start(vec![prompt("choice", &["A", "B"])]).unwrap();
        h.run_for(20_000);
        let calls_before = h.calls();

        let outcome = h.sequencer.respond("Z").unwrap();

        assert_eq!(
            outcome,
            RespondOutcome::Rejected {
                prompt_id: carecue_contracts::prompt::PromptId::new("choice"),
                option: "Z".to_string(),
            }
        );
        assert_eq!(h.sequencer.phase(), SequencerPhase::Showing);
        assert_eq!(h.calls(), calls_before, "no hide_prompt on a rejected option");
        h.assert_timer_invariant();

        // A retry with a valid label still works.
        assert!(h.sequencer.respond("B").unwrap().is_accepted());
    }

    #[test]
    fn test_dismiss_hides_without_confirmation() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        h.run_for(20_000);

        h.sequencer.dismiss().unwrap();

        assert_eq!(h.sequencer.phase(), SequencerPhase::Responded);
        assert_eq!(h.sequencer.state().response, None);
        assert_eq!(h.calls().last(), Some(&SurfaceCall::Hide(false)));
        h.assert_timer_invariant();
    }

    #[test]
    fn test_respond_outside_showing_is_invalid_transition() {
        let mut h = Harness::new();

        assert!(matches!(h.sequencer.respond("Yes"), Err(CareError::InvalidTransition { .. })));
        assert!(matches!(h.sequencer.dismiss(), Err(CareError::InvalidTransition { .. })));

        h.sequencer.start(three_prompts()).unwrap();
        assert!(matches!(h.sequencer.respond("Yes"), Err(CareError::InvalidTransition { .. })));

        h.run_for(20_000);
        h.sequencer.respond("Yes").unwrap();
        // Already Responded: a second answer is misuse, not a retry.
        assert!(matches!(h.sequencer.respond("Yes"), Err(CareError::InvalidTransition { .. })));
        assert!(matches!(h.sequencer.dismiss(), Err(CareError::InvalidTransition { .. })));
        assert!(h.calls().iter().filter(|c| matches!(c, SurfaceCall::Hide(_))).count() == 1);
    }

    // ── Queue exhaustion and visibility ──────────────────────────────────────

    #[test]
    fn test_queue_exhaustion_shows_each_prompt_once() {
        let mut h = Harness::new();
        let queue = three_prompts();
        let n = queue.len();
        h.sequencer.start(queue).unwrap();

        // Dismiss as soon as each prompt appears.
        for _ in 0..10 {
            h.run_for(100_000);
            if h.sequencer.phase() == SequencerPhase::Showing {
                h.sequencer.dismiss().unwrap();
            }
        }

        assert_eq!(h.shows(), n);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.sequencer.queue_index(), None);
        assert_eq!(h.clock.pending_count(), 0);

        h.run_for(10_000_000);
        assert_eq!(h.shows(), n, "idle forever after the queue is exhausted");
    }

    #[test]
    fn test_single_visibility_across_mixed_interactions() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();

        h.run_for(20_000);
        let _ = h.sequencer.respond("nope");
        h.sequencer.respond("Not yet").unwrap();
        h.run_for(500);
        let _ = h.sequencer.dismiss();
        h.run_for(100_000);
        h.sequencer.dismiss().unwrap();
        h.run_for(100_000);
        h.sequencer.respond("Taken").unwrap();
        h.run_for(100_000);

        let mut visible = false;
        for call in h.calls() {
            match call {
                SurfaceCall::Show(id) => {
                    assert!(!visible, "'{}' shown while another prompt was visible", id);
                    visible = true;
                }
                SurfaceCall::Hide(_) => {
                    assert!(visible, "hide without a visible prompt");
                    visible = false;
                }
            }
        }
        assert!(!visible);
    }

    #[test]
    fn test_responses_history_records_each_prompt() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();

        h.run_for(20_000);
        h.sequencer.respond("Yes").unwrap();
        h.run_for(91_200);
        h.sequencer.dismiss().unwrap();
        h.run_for(91_200);
        h.sequencer.respond("Skipped").unwrap();
        h.run_for(1_200);

        let history: Vec<(String, Option<String>)> = h
            .sequencer
            .responses()
            .iter()
            .map(|r| (r.prompt_id.0.clone(), r.response.clone()))
            .collect();
        assert_eq!(
            history,
            vec![
                ("hydration".to_string(), Some("Yes".to_string())),
                ("mood".to_string(), None),
                ("medication".to_string(), Some("Skipped".to_string())),
            ]
        );

        let records = h.records.lock().unwrap();
        assert!(matches!(
            records.last().map(|r| &r.entry),
            Some(JournalEntry::SequenceComplete { answered: 2, dismissed: 1 })
        ));
    }

    // ── stop ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_stop_is_idempotent() {
        let mut h = Harness::new();
        h.sequencer.stop();
        h.sequencer.stop();
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.sequencer.queue_index(), None);

        h.sequencer.start(three_prompts()).unwrap();
        h.sequencer.stop();
        h.sequencer.stop();
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.sequencer.queue_index(), None);
        assert!(h.records.lock().unwrap().iter().filter(|r| r.entry.kind() == "sequence_stopped").count() == 1);
    }

    #[test]
    fn test_stop_cancels_timer_and_stale_delivery_is_noop() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        h.run_for(20_000);
        h.sequencer.respond("Yes").unwrap();

        let settle_token = h.sequencer.pending_timer().expect("settle timer armed");
        h.sequencer.stop();

        assert!(!h.clock.is_pending(settle_token), "stop cancels synchronously");
        assert_eq!(h.clock.pending_count(), 0);

        // A host that already dequeued the token delivers it anyway.
        assert!(!h.sequencer.on_timer(settle_token));
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.sequencer.queue_index(), None);

        h.run_for(1_000_000);
        assert_eq!(h.shows(), 1);
    }

    #[test]
    fn test_stop_while_showing_hides_prompt() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        h.run_for(20_000);

        h.sequencer.stop();

        assert_eq!(h.calls().last(), Some(&SurfaceCall::Hide(false)));
        assert!(matches!(h.sequencer.respond("Yes"), Err(CareError::InvalidTransition { .. })));
        h.assert_timer_invariant();
    }

    #[test]
    fn test_stop_while_waiting_cancels_initial_delay_timer() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        let token = h.sequencer.pending_timer().expect("initial delay armed");
        assert!(h.clock.is_pending(token));

        h.sequencer.stop();

        assert!(!h.clock.is_pending(token), "cancelled before stop() returned");
        assert_eq!(h.clock.pending_count(), 0);
        assert_eq!(h.sequencer.pending_timer(), None);
        h.assert_timer_invariant();

        // A host that dequeued the token before stop() delivers it late.
        assert!(!h.sequencer.on_timer(token));
        h.run_for(1_000_000);

        assert_eq!(h.shows(), 0);
        assert_eq!(h.sequencer.phase(), SequencerPhase::Idle);
        assert_eq!(h.sequencer.queue_index(), None);
    }

    #[test]
    fn test_restart_after_stop_begins_from_first_prompt() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();
        h.run_for(20_000);
        h.sequencer.respond("Yes").unwrap();
        h.sequencer.stop();

        h.sequencer.start(three_prompts()).unwrap();
        assert!(h.sequencer.responses().is_empty());
        h.run_for(20_000);
        assert_eq!(h.calls().last(), Some(&SurfaceCall::Show("hydration".to_string())));
    }

    #[test]
    fn test_foreign_token_is_ignored() {
        let mut h = Harness::new();
        h.sequencer.start(three_prompts()).unwrap();

        let foreign = h.clock.schedule(1);
        h.clock.advance_by(1);
        assert!(!h.sequencer.on_timer(foreign));
        assert_eq!(h.sequencer.phase(), SequencerPhase::Waiting);
    }
}
