//! Reference walkthroughs.
//!
//! Each scenario opens a `PatientSession` on the default check-in
//! configuration, drives it on the simulated clock, prints what the patient
//! would have seen, and checks the session journal at the end.

pub mod checkin_sequence;
pub mod pain_escalation;
pub mod teardown;

use carecue_journal::InMemoryJournal;

/// Print the journal's integrity line shared by every scenario.
pub(crate) fn print_journal_summary(journal: &InMemoryJournal) {
    let log = journal.export_log();
    println!(
        "  Journal chain integrity: {} ({} record(s), sealed: {})",
        if journal.verify_integrity() { "VERIFIED" } else { "FAILED" },
        log.events.len(),
        if log.sealed { "yes" } else { "no" }
    );
}

/// `mm:ss.mmm` on the simulated clock.
pub(crate) fn clock_label(ms: u64) -> String {
    format!("{:02}:{:02}.{:03}", ms / 60_000, (ms / 1_000) % 60, ms % 1_000)
}
