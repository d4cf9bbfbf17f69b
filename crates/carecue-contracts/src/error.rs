//! Error types for the CareCue controllers.
//!
//! All fallible operations return `CareResult<T>`. Outcomes that are part of
//! normal operation (a rejected response option, starting an empty queue) are
//! NOT errors; they are returned as `Ok` values so the host never has to treat
//! ordinary user input as a failure.

use thiserror::Error;

/// The unified error type for CareCue.
#[derive(Debug, Error)]
pub enum CareError {
    /// An operation was called in a phase that does not permit it.
    ///
    /// This is a programming error in the host (e.g. `respond()` while no
    /// prompt is visible) and is surfaced so misuse shows up in tests.
    #[error("invalid transition: '{operation}' is not allowed while {phase}")]
    InvalidTransition { operation: String, phase: String },

    /// A prompt definition is malformed (empty id, no options, duplicates).
    #[error("invalid prompt definition: {reason}")]
    InvalidPrompt { reason: String },

    /// A configuration document is missing, unreadable, or inconsistent.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The session journal could not append a record.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },
}

impl CareError {
    /// Build an `InvalidTransition` from an operation name and a phase.
    pub fn invalid_transition(operation: &str, phase: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            operation: operation.to_string(),
            phase: phase.to_string(),
        }
    }
}

/// Convenience alias used throughout the CareCue crates.
pub type CareResult<T> = Result<T, CareError>;
