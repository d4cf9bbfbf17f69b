//! Trailing-edge debounce over a `Clock`.
//!
//! Every `push` replaces the pending value and re-arms the settle timer, so
//! only the last value of a burst is ever delivered.

use carecue_contracts::timer::TimerToken;

use crate::{timer::TimerSlot, traits::Clock};

/// Coalesces bursts of values into the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    window_ms: u64,
    slot: TimerSlot,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            slot: TimerSlot::new(),
            pending: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Replace the pending value and restart the window.
    pub fn push(&mut self, clock: &dyn Clock, value: T) -> TimerToken {
        self.pending = Some(value);
        self.slot.arm(clock, self.window_ms)
    }

    /// Deliver a fired timer. Yields the settled value if `token` is the
    /// current window's timer.
    pub fn on_timer(&mut self, token: TimerToken) -> Option<T> {
        if self.slot.claim(token) {
            self.pending.take()
        } else {
            None
        }
    }

    /// End the window now and yield the pending value, if any.
    pub fn flush(&mut self, clock: &dyn Clock) -> Option<T> {
        self.slot.disarm(clock);
        self.pending.take()
    }

    /// Drop the pending value and cancel the timer.
    pub fn cancel(&mut self, clock: &dyn Clock) {
        self.slot.disarm(clock);
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn burst_settles_to_last_value() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(300);

        debouncer.push(&clock, 3);
        clock.advance_by(100);
        debouncer.push(&clock, 8);
        clock.advance_by(100);
        debouncer.push(&clock, 9);

        let fired = clock.advance_by(299);
        assert!(fired.is_empty(), "window restarts on every push");

        let fired = clock.advance_by(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(debouncer.on_timer(fired[0]), Some(9));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn flush_yields_immediately_and_cancels_timer() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(300);
        let token = debouncer.push(&clock, "draft");

        assert_eq!(debouncer.flush(&clock), Some("draft"));
        assert!(!clock.is_pending(token));
        assert_eq!(debouncer.on_timer(token), None);
    }

    #[test]
    fn cancel_discards_pending_value() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(50);
        let token = debouncer.push(&clock, 1u8);

        debouncer.cancel(&clock);
        assert_eq!(clock.pending_count(), 0);
        assert_eq!(debouncer.on_timer(token), None);
        assert_eq!(debouncer.flush(&clock), None);
    }
}
