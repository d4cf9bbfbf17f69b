//! # carecue-contracts
//!
//! Shared types, settings, and errors for the CareCue prompt scheduler.
//!
//! All crates in the workspace import from here. No controller logic lives in
//! this crate, only data definitions, the severity classification table, and
//! error types.

pub mod error;
pub mod journal;
pub mod prompt;
pub mod reminder;
pub mod session;
pub mod settings;
pub mod severity;
pub mod timer;
