//! Scenario 3: Teardown
//!
//! The patient navigates away in the middle of things:
//!
//!   1. The first prompt has been answered and its 1.2 s thank-you window is
//!      still running. A slider reading is mid-debounce.
//!   2. The host stops the sequence and opens a new report form. Both timers
//!      are cancelled before the calls return.
//!   3. A host that had already dequeued the settle timer delivers it anyway;
//!      the sequencer ignores it and stays idle.
//!   4. The session ends and the journal is sealed; a controller writing
//!      after that is refused by the journal but never blocked.

use carecue_contracts::{
    error::CareResult,
    journal::{JournalEntry, JournalRecord},
};
use carecue_core::traits::JournalWriter;

use crate::{
    mock_data::default_config,
    scenarios::{clock_label, print_journal_summary},
    session::PatientSession,
};

/// Observations a test can assert on.
#[derive(Debug)]
pub struct TeardownReport {
    pub pending_before_stop: usize,
    pub pending_after_stop: usize,
    pub stale_token_claimed: bool,
    pub prompts_shown: usize,
    pub escalations: usize,
    pub write_after_seal_refused: bool,
    pub journal_verified: bool,
}

/// Walk through the teardown on a fresh session.
pub fn play() -> CareResult<(PatientSession, TeardownReport)> {
    let mut session = PatientSession::new(default_config()?)?;
    session.start_checkins()?;
    session.run_for(20_000);
    session.respond("Yes")?;
    session.report_severity(9);

    let pending_before_stop = session.clock().pending_count();
    let stale = session.sequencer().pending_timer();

    session.stop_checkins();
    session.new_report();
    let pending_after_stop = session.clock().pending_count();

    // Redeliver the cancelled settle timer by hand.
    let stale_token_claimed = stale.is_some_and(|token| session.deliver(token));

    // Long after: nothing left to fire.
    session.run_for(600_000);

    let log = session.end()?;
    let late = JournalRecord::new(session.now_ms(), JournalEntry::Deescalated { value: 0 });
    let write_after_seal_refused = session.journal().write(&late).is_err();

    let report = TeardownReport {
        pending_before_stop,
        pending_after_stop,
        stale_token_claimed,
        prompts_shown: session.surfaces().shown_prompt_ids().len(),
        escalations: log.count_kind("escalated"),
        write_after_seal_refused,
        journal_verified: session.journal().verify_integrity(),
    };
    Ok((session, report))
}

pub fn run_scenario() -> CareResult<()> {
    println!("=== Scenario 3: Teardown ===");
    println!();

    let (session, report) = play()?;

    println!("  Answered the first prompt; thank-you window and slider debounce running.");
    println!("  Pending timers before stop:   {}", report.pending_before_stop);
    println!("  Pending timers after stop:    {}", report.pending_after_stop);
    println!(
        "  Stale settle timer redelivered: {}",
        if report.stale_token_claimed { "CLAIMED (bug)" } else { "ignored" }
    );
    println!(
        "  Sequencer after stop: phase={}  queue_index={:?}",
        session.sequencer().phase(),
        session.sequencer().queue_index()
    );
    println!("  Prompts shown in total:       {}", report.prompts_shown);
    println!("  Escalations fired:            {}", report.escalations);
    println!(
        "  Write after seal:             {}",
        if report.write_after_seal_refused { "refused" } else { "ACCEPTED (bug)" }
    );
    println!("  Session closed at {}", clock_label(session.now_ms()));
    print_journal_summary(session.journal());
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
