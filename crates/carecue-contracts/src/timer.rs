//! Timer handles exchanged between a `Clock` and the controllers.

use serde::{Deserialize, Serialize};

/// Opaque handle for one scheduled timer.
///
/// Tokens are unique per clock and never reused, so a controller can tell
/// its own armed timer apart from a stale or foreign one by equality alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerToken(pub u64);

impl std::fmt::Display for TimerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}
