//! Severity scale, tiers, and the escalation guard's state record.
//!
//! The reported value is a bounded 0–10 scale (a pain/distress slider).
//! Tiers are derived purely from the value via two thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{CareError, CareResult};

/// Lowest value on the severity scale.
pub const SEVERITY_MIN: u8 = 0;
/// Highest value on the severity scale.
pub const SEVERITY_MAX: u8 = 10;

/// Clamp an arbitrary reading onto the 0–10 scale.
pub fn clamp_severity(value: i64) -> u8 {
    value.clamp(SEVERITY_MIN as i64, SEVERITY_MAX as i64) as u8
}

/// Discrete severity classification.
///
/// Ordered: `Normal < Elevated < Critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    #[default]
    Normal,
    Elevated,
    Critical,
}

impl SeverityTier {
    /// The escalation payload for this tier, or `None` for `Normal`.
    pub fn escalation(self) -> Option<EscalationTier> {
        match self {
            SeverityTier::Normal => None,
            SeverityTier::Elevated => Some(EscalationTier::Elevated),
            SeverityTier::Critical => Some(EscalationTier::Critical),
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SeverityTier::Normal => "normal",
            SeverityTier::Elevated => "elevated",
            SeverityTier::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// A tier that requires interrupting the user.
///
/// `Normal` is deliberately absent so a host can never be asked to escalate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationTier {
    Elevated,
    Critical,
}

impl From<EscalationTier> for SeverityTier {
    fn from(tier: EscalationTier) -> Self {
        match tier {
            EscalationTier::Elevated => SeverityTier::Elevated,
            EscalationTier::Critical => SeverityTier::Critical,
        }
    }
}

impl std::fmt::Display for EscalationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SeverityTier::from(*self).fmt(f)
    }
}

/// The two cut points of the scale.
///
/// `value < elevated` is Normal, `elevated <= value < critical` is Elevated,
/// `value >= critical` is Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub elevated: u8,
    pub critical: u8,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self { elevated: 7, critical: 9 }
    }
}

impl SeverityThresholds {
    /// Build thresholds, rejecting any pair that does not satisfy
    /// `0 < elevated < critical <= 10`.
    pub fn new(elevated: u8, critical: u8) -> CareResult<Self> {
        let thresholds = Self { elevated, critical };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> CareResult<()> {
        if self.elevated == SEVERITY_MIN || self.elevated >= self.critical || self.critical > SEVERITY_MAX {
            return Err(CareError::ConfigError {
                reason: format!(
                    "severity thresholds must satisfy {} < elevated < critical <= {} (got elevated={}, critical={})",
                    SEVERITY_MIN, SEVERITY_MAX, self.elevated, self.critical
                ),
            });
        }
        Ok(())
    }

    /// Classify an in-range value.
    pub fn classify(&self, value: u8) -> SeverityTier {
        if value >= self.critical {
            SeverityTier::Critical
        } else if value >= self.elevated {
            SeverityTier::Elevated
        } else {
            SeverityTier::Normal
        }
    }
}

/// The guard's state record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityState {
    /// Latest clamped reading, `None` before the first report.
    pub current_value: Option<u8>,
    /// Tier of `current_value` (Normal before the first report).
    pub tier: SeverityTier,
    /// The tier the escalation effect last fired for, reset on Normal.
    pub last_escalated_tier: Option<EscalationTier>,
}
