//! Timing and threshold settings for the two controllers.
//!
//! Defaults match the documented behaviour of the patient app: prompts every
//! 90 s after a 1.2 s settle window, severity debounced over 300 ms.

use serde::{Deserialize, Serialize};

use crate::error::{CareError, CareResult};
use crate::severity::SeverityThresholds;

/// Default pause between a settle window ending and the next prompt (90 s).
pub const DEFAULT_INTER_PROMPT_DELAY_MS: u64 = 90_000;
/// Default "thank you" window after a response or dismissal (1.2 s).
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_200;
/// Default severity debounce window (300 ms).
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Settings for `ReminderSequencer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerSettings {
    pub inter_prompt_delay_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            inter_prompt_delay_ms: DEFAULT_INTER_PROMPT_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// Settings for `SeverityEscalationGuard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardSettings {
    pub debounce_ms: u64,
    pub thresholds: SeverityThresholds,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            thresholds: SeverityThresholds::default(),
        }
    }
}

impl GuardSettings {
    pub fn validate(&self) -> CareResult<()> {
        if self.debounce_ms == 0 {
            return Err(CareError::ConfigError {
                reason: "debounce_ms must be greater than zero".to_string(),
            });
        }
        self.thresholds.validate()
    }
}
