//! Configuration schema.
//!
//! Every field carries a serde default equal to the documented default, so an
//! empty document deserializes to the stock configuration.
//!
//! Example:
//! ```toml
//! [schedule]
//! initial_delay_ms = 20000
//! inter_prompt_delay_ms = 90000
//! settle_delay_ms = 1200
//!
//! [severity]
//! debounce_ms = 300
//! elevated_threshold = 7
//! critical_threshold = 9
//!
//! [[prompts]]
//! id = "hydration"
//! question = "Have you had some water in the last hour?"
//! options = ["Yes", "Not yet"]
//! ```

use serde::{Deserialize, Serialize};

use carecue_contracts::{
    prompt::DEFAULT_INITIAL_DELAY_MS,
    settings::{DEFAULT_DEBOUNCE_MS, DEFAULT_INTER_PROMPT_DELAY_MS, DEFAULT_SETTLE_DELAY_MS},
    severity::SeverityThresholds,
};

/// Reminder timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Delay before the first prompt, unless the prompt overrides it.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_inter_prompt_delay_ms")]
    pub inter_prompt_delay_ms: u64,

    /// The "thank you" window after a response or dismissal.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            inter_prompt_delay_ms: DEFAULT_INTER_PROMPT_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// Severity guard tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Lowest value classified as Elevated.
    #[serde(default = "default_elevated_threshold")]
    pub elevated_threshold: u8,

    /// Lowest value classified as Critical.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: u8,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            elevated_threshold: default_elevated_threshold(),
            critical_threshold: default_critical_threshold(),
        }
    }
}

/// One `[[prompts]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,

    /// Overrides `schedule.initial_delay_ms`. Only meaningful on the first
    /// prompt of the queue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay_ms: Option<u64>,
}

/// The top-level document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareCueConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub severity: SeverityConfig,

    /// Check-in prompts in presentation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<PromptConfig>,
}

fn default_initial_delay_ms() -> u64 {
    DEFAULT_INITIAL_DELAY_MS
}

fn default_inter_prompt_delay_ms() -> u64 {
    DEFAULT_INTER_PROMPT_DELAY_MS
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_elevated_threshold() -> u8 {
    SeverityThresholds::default().elevated
}

fn default_critical_threshold() -> u8 {
    SeverityThresholds::default().critical
}
