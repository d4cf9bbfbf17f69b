//! # carecue-reminder
//!
//! Presents a queue of check-in prompts one at a time, on a timer, and
//! records each answer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut sequencer = ReminderSequencer::new(clock, Box::new(surface), SequencerSettings::default());
//! sequencer.start(prompts)?;
//!
//! // host event loop
//! while let Some(token) = clock.next_due(now) {
//!     sequencer.on_timer(token);
//! }
//!
//! // user taps an option
//! match sequencer.respond("Yes")? {
//!     RespondOutcome::Accepted { .. } => {}
//!     RespondOutcome::Rejected { .. } => { /* keep the modal open */ }
//! }
//! ```

pub mod sequencer;

pub use sequencer::ReminderSequencer;
