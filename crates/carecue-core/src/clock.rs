//! Deterministic clock.
//!
//! `ManualClock` only moves when told to. Tests use it to step through
//! multi-second delays instantly; the TUI feeds it wall-clock deltas.
//!
//! Delivery loop used by hosts:
//!
//! ```rust,ignore
//! while let Some(token) = clock.next_due(deadline) {
//!     sequencer.on_timer(token);
//!     guard.on_timer(token);
//! }
//! clock.advance_to(deadline);
//! ```
//!
//! Timers armed from inside a delivery are picked up by the same loop if
//! they fall due before the deadline.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use carecue_contracts::timer::TimerToken;

use crate::traits::Clock;

struct ManualState {
    now_ms: u64,
    next_id: u64,
    /// Ordered by (due_ms, token id); ids grow monotonically so equal due
    /// times fire in scheduling order.
    queue: BTreeSet<(u64, u64)>,
    due_by_id: HashMap<u64, u64>,
}

/// A clock that advances only on request.
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    /// A clock at t = 0 with nothing pending.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            state: Mutex::new(ManualState {
                now_ms,
                next_id: 1,
                queue: BTreeSet::new(),
                due_by_id: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pop the earliest pending timer due at or before `deadline_ms`.
    ///
    /// Moves `now` forward to that timer's due time. Returns `None` once
    /// nothing else is due by the deadline; `now` is left untouched then.
    pub fn next_due(&self, deadline_ms: u64) -> Option<TimerToken> {
        let mut state = self.lock();
        let &(due, id) = state.queue.iter().next()?;
        if due > deadline_ms {
            return None;
        }
        state.queue.remove(&(due, id));
        state.due_by_id.remove(&id);
        state.now_ms = state.now_ms.max(due);
        Some(TimerToken(id))
    }

    /// Move `now` to `target_ms` without delivering anything.
    ///
    /// Hosts drain `next_due(target_ms)` first.
    pub fn advance_to(&self, target_ms: u64) {
        let mut state = self.lock();
        state.now_ms = state.now_ms.max(target_ms);
    }

    /// Drain every timer due within `delta_ms` from now, in order, then
    /// move `now` to the end of the interval.
    ///
    /// Only suitable when nothing is armed in response to the fired tokens;
    /// otherwise use the `next_due` loop.
    pub fn advance_by(&self, delta_ms: u64) -> Vec<TimerToken> {
        let deadline = self.now_ms().saturating_add(delta_ms);
        let mut fired = Vec::new();
        while let Some(token) = self.next_due(deadline) {
            fired.push(token);
        }
        self.advance_to(deadline);
        fired
    }

    /// Number of timers still pending.
    pub fn pending_count(&self) -> usize {
        self.lock().queue.len()
    }

    /// True if `token` is armed and has not fired or been cancelled.
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.lock().due_by_id.contains_key(&token.0)
    }

    /// Due time of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.lock().queue.iter().next().map(|&(due, _)| due)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.lock().now_ms
    }

    fn schedule(&self, delay_ms: u64) -> TimerToken {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now_ms.saturating_add(delay_ms);
        state.queue.insert((due, id));
        state.due_by_id.insert(id, due);
        debug!(token = id, due_ms = due, "timer scheduled");
        TimerToken(id)
    }

    fn cancel(&self, token: TimerToken) -> bool {
        let mut state = self.lock();
        match state.due_by_id.remove(&token.0) {
            Some(due) => {
                state.queue.remove(&(due, token.0));
                debug!(token = token.0, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_due_order_then_schedule_order() {
        let clock = ManualClock::new();
        let late = clock.schedule(500);
        let early = clock.schedule(100);
        let tie = clock.schedule(100);

        assert_eq!(clock.advance_by(1_000), vec![early, tie, late]);
        assert_eq!(clock.now_ms(), 1_000);
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn next_due_moves_now_to_the_fired_timer() {
        let clock = ManualClock::starting_at(10);
        let token = clock.schedule(40);

        assert_eq!(clock.next_due(30), None, "not due yet");
        assert_eq!(clock.now_ms(), 10);
        assert_eq!(clock.next_due(100), Some(token));
        assert_eq!(clock.now_ms(), 50);
    }

    #[test]
    fn cancel_is_synchronous_and_single_shot() {
        let clock = ManualClock::new();
        let token = clock.schedule(10);
        assert!(clock.is_pending(token));

        assert!(clock.cancel(token));
        assert!(!clock.is_pending(token));
        assert!(!clock.cancel(token), "second cancel is a no-op");
        assert!(clock.advance_by(100).is_empty());
    }

    #[test]
    fn tokens_are_never_reused() {
        let clock = ManualClock::new();
        let a = clock.schedule(1);
        clock.advance_by(5);
        let b = clock.schedule(1);
        assert_ne!(a, b);
    }
}
