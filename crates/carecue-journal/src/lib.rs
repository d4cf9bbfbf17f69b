//! # carecue-journal
//!
//! Append-only, SHA-256 hash-chained record of everything a CareCue session
//! decided: prompts shown and answered, sequences completed or stopped,
//! escalations fired.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use carecue_journal::InMemoryJournal;
//!
//! let journal = Arc::new(InMemoryJournal::new(session_id.to_string()));
//! let sequencer = ReminderSequencer::new(clock, surface, settings)
//!     .with_journal(Box::new(Arc::clone(&journal)));
//!
//! // ... session runs ...
//! journal.finalize(&session_id.to_string())?;
//! assert!(journal.verify_integrity());
//! ```
//!
//! The journal is in memory only.

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use event::{JournalEvent, JournalLog, GENESIS_HASH};
pub use memory::InMemoryJournal;

// ── Tests ─────────────────────────────────────────────────────────────────────
