//! Loading, validation, and conversion into controller settings.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use carecue_contracts::{
    error::{CareError, CareResult},
    prompt::PromptDefinition,
    settings::{GuardSettings, SequencerSettings},
    severity::SeverityThresholds,
};

use crate::schema::CareCueConfig;

impl CareCueConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `CareError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or fails `validate()`.
    pub fn from_toml_str(s: &str) -> CareResult<Self> {
        let config: CareCueConfig = toml::from_str(s).map_err(|e| CareError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        config.validate()?;
        debug!(prompts = config.prompts.len(), "configuration loaded");
        Ok(config)
    }

    /// Read the file at `path` and parse it with `from_toml_str`.
    pub fn from_file(path: &Path) -> CareResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CareError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Render the effective configuration back to TOML.
    pub fn to_toml_string(&self) -> CareResult<String> {
        toml::to_string_pretty(self).map_err(|e| CareError::ConfigError {
            reason: format!("failed to render configuration: {}", e),
        })
    }

    /// Check every cross-field constraint.
    ///
    /// - `0 < elevated_threshold < critical_threshold <= 10`
    /// - `debounce_ms > 0`
    /// - prompt ids non-empty and unique
    /// - each prompt has at least one option and no duplicate options
    pub fn validate(&self) -> CareResult<()> {
        self.guard_settings().validate()?;

        let mut seen = HashSet::new();
        for prompt in &self.prompts {
            if !seen.insert(prompt.id.as_str()) {
                return Err(CareError::ConfigError {
                    reason: format!("prompt id '{}' is declared more than once", prompt.id),
                });
            }
        }

        self.prompt_queue().map(|_| ())
    }

    /// Build the prompt queue in declaration order.
    ///
    /// A prompt without its own `initial_delay_ms` inherits
    /// `schedule.initial_delay_ms`.
    pub fn prompt_queue(&self) -> CareResult<Vec<PromptDefinition>> {
        self.prompts
            .iter()
            .map(|p| {
                let delay = p.initial_delay_ms.unwrap_or(self.schedule.initial_delay_ms);
                PromptDefinition::new(p.id.clone(), p.question.clone(), p.options.iter().cloned())
                    .map(|def| def.with_initial_delay_ms(delay))
                    .map_err(|e| CareError::ConfigError {
                        reason: format!("prompt '{}': {}", p.id, e),
                    })
            })
            .collect()
    }

    pub fn sequencer_settings(&self) -> SequencerSettings {
        SequencerSettings {
            inter_prompt_delay_ms: self.schedule.inter_prompt_delay_ms,
            settle_delay_ms: self.schedule.settle_delay_ms,
        }
    }

    pub fn guard_settings(&self) -> GuardSettings {
        GuardSettings {
            debounce_ms: self.severity.debounce_ms,
            thresholds: SeverityThresholds {
                elevated: self.severity.elevated_threshold,
                critical: self.severity.critical_threshold,
            },
        }
    }
}
