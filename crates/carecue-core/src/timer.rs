//! Single-timer ownership.
//!
//! Each controller holds at most one outstanding timer. `TimerSlot` enforces
//! that: arming cancels whatever was armed before, and a delivered token is
//! only honoured if it is the one currently armed.

use carecue_contracts::timer::TimerToken;

use crate::traits::Clock;

/// Holds zero or one armed timer.
#[derive(Debug, Default)]
pub struct TimerSlot {
    token: Option<TimerToken>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any armed timer, then arm a new one `delay_ms` from now.
    pub fn arm(&mut self, clock: &dyn Clock, delay_ms: u64) -> TimerToken {
        self.disarm(clock);
        let token = clock.schedule(delay_ms);
        self.token = Some(token);
        token
    }

    /// Cancel the armed timer, if any. Returns true if one was armed.
    pub fn disarm(&mut self, clock: &dyn Clock) -> bool {
        match self.token.take() {
            Some(token) => {
                clock.cancel(token);
                true
            }
            None => false,
        }
    }

    /// Accept a delivered token.
    ///
    /// Returns true and empties the slot only when `token` is the armed one.
    /// Stale or foreign tokens leave the slot untouched.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        if self.token == Some(token) {
            self.token = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn arming_twice_leaves_one_pending_timer() {
        let clock = ManualClock::new();
        let mut slot = TimerSlot::new();

        let first = slot.arm(&clock, 100);
        let second = slot.arm(&clock, 100);

        assert!(!clock.is_pending(first));
        assert!(clock.is_pending(second));
        assert_eq!(clock.pending_count(), 1);
    }

    #[test]
    fn claim_ignores_stale_tokens() {
        let clock = ManualClock::new();
        let mut slot = TimerSlot::new();

        let stale = slot.arm(&clock, 10);
        let live = slot.arm(&clock, 10);

        assert!(!slot.claim(stale));
        assert!(slot.is_armed());
        assert!(slot.claim(live));
        assert!(!slot.is_armed());
        assert!(!slot.claim(live), "a token is claimed at most once");
    }

    #[test]
    fn disarm_cancels_on_the_clock() {
        let clock = ManualClock::new();
        let mut slot = TimerSlot::new();
        slot.arm(&clock, 10);

        assert!(slot.disarm(&clock));
        assert_eq!(clock.pending_count(), 0);
        assert!(!slot.disarm(&clock));
    }
}
