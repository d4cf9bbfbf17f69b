//! Simulated patient-app data for the CareCue reference host.
//!
//! Everything here is hardcoded and fictional: the check-in schedule, the
//! urgent-contact directory, and the scripted slider drags the scenarios
//! replay. No external system is contacted.

use serde::Serialize;

use carecue_config::CareCueConfig;
use carecue_contracts::{error::CareResult, severity::EscalationTier};

// ── Check-in configuration ───────────────────────────────────────────────────

/// The reference app's default schedule and prompt set.
pub const CHECKIN_CONFIG: &str = include_str!("../config/checkin.toml");

/// Parse `CHECKIN_CONFIG`.
pub fn default_config() -> CareResult<CareCueConfig> {
    CareCueConfig::from_toml_str(CHECKIN_CONFIG)
}

// ── Urgent-contact directory (mock) ──────────────────────────────────────────

/// Who the escalation banner points the patient to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgentContact {
    pub label: &'static str,
    pub phone: &'static str,
    /// Secure-chat channel the banner deep-links to.
    pub channel: &'static str,
}

/// Map an escalation tier to its contact.
///
/// - Elevated → the care team's nurse line
/// - Critical → the on-call clinician
pub fn urgent_contact(tier: EscalationTier) -> UrgentContact {
    match tier {
        EscalationTier::Elevated => UrgentContact {
            label: "Care team nurse line",
            phone: "+1-555-0142",
            channel: "care-team",
        },
        EscalationTier::Critical => UrgentContact {
            label: "On-call clinician",
            phone: "+1-555-0199",
            channel: "on-call-urgent",
        },
    }
}

// ── Slider drags (mock) ──────────────────────────────────────────────────────

/// One slider movement: wait `gap_ms` after the previous one, then report
/// `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderStep {
    pub gap_ms: u64,
    pub value: i64,
}

const fn step(gap_ms: u64, value: i64) -> SliderStep {
    SliderStep { gap_ms, value }
}

/// A quick drag from mild to severe pain, all inside one debounce window.
pub fn flare_drag() -> Vec<SliderStep> {
    vec![step(0, 3), step(60, 5), step(60, 8), step(80, 9)]
}

/// A slow drag that settles on each value, dwelling at 8.
pub fn slow_rise_to_elevated() -> Vec<SliderStep> {
    vec![step(0, 6), step(400, 7), step(400, 8), step(400, 8)]
}

/// Easing off back into the normal band.
pub fn easing_drag() -> Vec<SliderStep> {
    vec![step(0, 6), step(90, 4), step(90, 2)]
}

/// A fumbled drag that overshoots the scale in both directions.
pub fn overshoot_drag() -> Vec<SliderStep> {
    vec![step(0, -2), step(50, 14)]
}
