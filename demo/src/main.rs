//! CareCue Patient Check-in Reference Demo CLI
//!
//! Runs one or all of the three reference scenarios on a simulated clock, or
//! prints the effective check-in configuration.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- checkin-sequence
//!   cargo run -p demo -- pain-escalation
//!   cargo run -p demo -- teardown
//!   cargo run -p demo -- show-config --config path/to/checkin.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use carecue_config::CareCueConfig;
use carecue_contracts::error::CareResult;
use carecue_ref_patient::{
    mock_data::default_config,
    scenarios::{checkin_sequence, pain_escalation, teardown},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CareCue: timed check-in prompts and debounced severity escalation.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "CareCue patient check-in reference demo",
    long_about = "Runs CareCue reference scenarios showing one-at-a-time check-in prompts,\n\
                  debounced pain escalation, synchronous teardown, and journal integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: Check-in Sequence (timing, rejection, dismissal).
    CheckinSequence,
    /// Scenario 2: Pain Escalation (debounce, re-arm, clamping).
    PainEscalation,
    /// Scenario 3: Teardown (stop, stale timers, journal sealing).
    Teardown,
    /// Validate and print a check-in configuration.
    ShowConfig {
        /// TOML file to load instead of the built-in default.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every transition and timer.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all()
        }
        Command::CheckinSequence => {
            print_banner();
            checkin_sequence::run_scenario()
        }
        Command::PainEscalation => {
            print_banner();
            pain_escalation::run_scenario()
        }
        Command::Teardown => {
            print_banner();
            teardown::run_scenario()
        }
        Command::ShowConfig { config } => show_config(config),
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run_all() -> CareResult<()> {
    checkin_sequence::run_scenario()?;
    pain_escalation::run_scenario()?;
    teardown::run_scenario()?;
    Ok(())
}

fn show_config(path: Option<PathBuf>) -> CareResult<()> {
    let (source, config) = match path {
        Some(path) => {
            let config = CareCueConfig::from_file(&path)?;
            (path.display().to_string(), config)
        }
        None => ("built-in default".to_string(), default_config()?),
    };
    info!(source = %source, "configuration validated");

    let sequencer = config.sequencer_settings();
    let guard = config.guard_settings();
    let queue = config.prompt_queue()?;

    println!("# source: {}", source);
    println!(
        "# {} prompt(s); first after {} ms, then every {} ms after a {} ms settle",
        queue.len(),
        queue.first().map_or(config.schedule.initial_delay_ms, |p| p.initial_delay_ms),
        sequencer.inter_prompt_delay_ms,
        sequencer.settle_delay_ms
    );
    println!(
        "# severity: normal < {} <= elevated < {} <= critical; debounce {} ms",
        guard.thresholds.elevated, guard.thresholds.critical, guard.debounce_ms
    );
    println!();
    print!("{}", config.to_toml_string()?);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("CareCue: Patient Check-in Scheduler");
    println!("Reference Demo (simulated clock)");
    println!("===================================");
    println!();
    println!("Controllers:");
    println!("  [1] ReminderSequencer: one prompt at a time; settle window, then inter-prompt delay");
    println!("  [2] SeverityEscalationGuard: debounced slider; one urgent contact per rise in tier");
    println!("  [3] Every decision appended to a SHA-256 hash-chained session journal");
    println!();
}
