//! # carecue-config
//!
//! TOML configuration for the CareCue controllers: reminder timing, severity
//! thresholds, and the check-in prompt queue.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use carecue_config::CareCueConfig;
//!
//! let config = CareCueConfig::from_file(Path::new("config/checkin.toml"))?;
//! let prompts = config.prompt_queue()?;
//! let settings = config.sequencer_settings();
//! ```
//!
//! A loaded configuration has always passed `validate()`.

pub mod loader;
pub mod schema;

pub use schema::{CareCueConfig, PromptConfig, ScheduleConfig, SeverityConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
