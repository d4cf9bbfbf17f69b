//! # carecue-escalation
//!
//! Turns a noisy 0–10 severity signal (a pain slider being dragged) into at
//! most one urgent-contact escalation per rise in tier.
//!
//! ```text
//! report(v) ──clamp──▶ classify ──▶ debounce window ──settle──▶ evaluate
//!                                                                  │
//!                    Normal: forget last escalation ◀──────────────┤
//!                    rise over last escalation: escalate(tier) ◀───┘
//! ```
//!
//! One guard serves both the live slider and the explicit submit button of
//! a report form; the submit path calls `flush()` instead of waiting for the
//! window to close.

pub mod guard;

pub use guard::SeverityEscalationGuard;
