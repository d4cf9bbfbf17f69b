//! Check-in prompt definitions.
//!
//! A `PromptDefinition` is created once at configuration time and never
//! mutated. The sequencer only reads it: it hands the definition to the host
//! surface for display and checks responses against `options`.

use serde::{Deserialize, Serialize};

use crate::error::{CareError, CareResult};

/// Default delay before the first prompt of a queue may appear (20 s).
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 20_000;

/// Stable identifier of a prompt, e.g. `PromptId("hydration")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptId(pub String);

impl PromptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PromptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One periodic check-in question with a fixed set of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique identifier within a queue.
    pub id: PromptId,
    /// Display text. The core never interprets it.
    pub question: String,
    /// Time from sequencer start until this prompt may first appear.
    ///
    /// Only read for the first entry of a queue; later entries wait for the
    /// sequencer's inter-prompt delay instead.
    pub initial_delay_ms: u64,
    /// Ordered, non-empty list of selectable response labels.
    pub options: Vec<String>,
}

impl PromptDefinition {
    /// Build a validated prompt with the default initial delay.
    ///
    /// Returns `CareError::InvalidPrompt` if the id is blank, `options` is
    /// empty, or an option label is blank or repeated.
    pub fn new<S: Into<String>>(
        id: impl Into<String>,
        question: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> CareResult<Self> {
        let prompt = Self {
            id: PromptId::new(id),
            question: question.into(),
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            options: options.into_iter().map(Into::into).collect(),
        };
        prompt.validate()?;
        Ok(prompt)
    }

    /// Override the initial delay.
    pub fn with_initial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    /// True if `option` is one of this prompt's labels (exact match).
    pub fn accepts(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Check the structural invariants of this definition.
    pub fn validate(&self) -> CareResult<()> {
        if self.id.0.trim().is_empty() {
            return Err(CareError::InvalidPrompt {
                reason: "prompt id must not be empty".to_string(),
            });
        }
        if self.options.is_empty() {
            return Err(CareError::InvalidPrompt {
                reason: format!("prompt '{}' has no options", self.id),
            });
        }
        for (i, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(CareError::InvalidPrompt {
                    reason: format!("prompt '{}' has a blank option at position {}", self.id, i),
                });
            }
            if self.options[..i].contains(option) {
                return Err(CareError::InvalidPrompt {
                    reason: format!("prompt '{}' lists option '{}' twice", self.id, option),
                });
            }
        }
        Ok(())
    }
}
