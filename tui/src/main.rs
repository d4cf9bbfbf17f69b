//! CareCue Patient Check-in: interactive Ratatui TUI
//!
//! A live patient session. Wall-clock time drives the simulated clock, so the
//! check-in prompts appear on their real schedule (use [t] to speed it up).
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  clock · speed · sequencer phase · next timer                       │
//!   ├─── left panel ──────────────────┬─── right panel ───────────────────┤
//!   │  Check-in prompt                │  Session Journal                  │
//!   ├─────────────────────────────────┴───────────────────────────────────┤
//!   │  Pain report (slider + escalation banner)                           │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! Logs are discarded unless `CARECUE_LOG=<file>` is set. [e] writes the
//! journal as JSON to `carecue-journal-<session>.json` in the working directory.

use std::{
    fs::File,
    io,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use carecue_config::CareCueConfig;
use carecue_contracts::{
    error::CareResult,
    journal::JournalEntry,
    reminder::{RespondOutcome, SequencerPhase},
    severity::{SeverityTier, SEVERITY_MAX, SEVERITY_MIN},
};
use carecue_journal::JournalEvent;
use carecue_ref_patient::{mock_data::default_config, PatientSession};

/// Simulated-time multipliers cycled with [t].
const SPEEDS: [u64; 4] = [1, 10, 60, 600];

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    session: PatientSession,
    /// Current slider position (what the patient is pointing at).
    slider: i64,
    speed_index: usize,
    last_tick: Instant,
    /// One-line feedback for the last key press.
    status: String,
}

impl App {
    fn new(config: CareCueConfig) -> CareResult<Self> {
        Ok(Self {
            session: PatientSession::new(config)?,
            slider: 0,
            speed_index: 0,
            last_tick: Instant::now(),
            status: "Press [s] to start today's check-ins.".to_string(),
        })
    }

    fn speed(&self) -> u64 {
        SPEEDS[self.speed_index]
    }

    /// Feed elapsed wall-clock time into the session.
    fn tick(&mut self) {
        let elapsed_ms = take_whole_millis(&mut self.last_tick, Instant::now());
        if elapsed_ms > 0 {
            self.session.run_for(elapsed_ms.saturating_mul(self.speed()));
        }
    }

    fn report<T>(&mut self, result: CareResult<T>, ok: impl FnOnce(T) -> String) {
        self.status = match result {
            Ok(value) => ok(value),
            Err(e) => {
                warn!(error = %e, "operation refused");
                format!("Not now: {}", e)
            }
        };
    }

    fn start(&mut self) {
        let result = self.session.start_checkins();
        self.report(result, |()| "Check-ins started.".to_string());
    }

    fn respond(&mut self, n: usize) {
        let result = self.session.respond_with_index(n);
        self.report(result, |outcome| match outcome {
            RespondOutcome::Accepted { option, .. } => format!("Thank you! Recorded \"{}\".", option),
            RespondOutcome::Rejected { option, .. } => format!("\"{}\" is not one of the choices.", option),
        });
    }

    fn dismiss(&mut self) {
        let result = self.session.dismiss();
        self.report(result, |()| "Prompt dismissed.".to_string());
    }

    fn stop(&mut self) {
        self.session.stop_checkins();
        self.status = "Check-ins stopped.".to_string();
    }

    fn move_slider(&mut self, delta: i64) {
        self.slider = (self.slider + delta).clamp(i64::from(SEVERITY_MIN), i64::from(SEVERITY_MAX));
        let tier = self.session.report_severity(self.slider);
        self.status = format!("Pain {} ({})", self.slider, tier);
    }

    fn submit(&mut self) {
        self.status = match self.session.submit_report() {
            Some(tier) => format!("Report submitted; {} escalation raised.", tier),
            None => "Report submitted.".to_string(),
        };
    }

    fn new_report(&mut self) {
        self.session.new_report();
        self.slider = 0;
        self.status = "New pain report.".to_string();
    }

    /// Write the journal, as it stands, to the working directory.
    fn export_journal(&mut self) {
        let path = format!("carecue-journal-{}.json", self.session.id());
        let log = self.session.journal().export_log();
        let result = serde_json::to_string_pretty(&log)
            .map_err(io::Error::other)
            .and_then(|json| std::fs::write(&path, json));
        self.status = match result {
            Ok(()) => format!("Journal ({} records) written to {}", log.events.len(), path),
            Err(e) => {
                warn!(error = %e, path = %path, "journal export failed");
                format!("Export failed: {}", e)
            }
        };
    }

    fn cycle_speed(&mut self) {
        self.tick();
        self.speed_index = (self.speed_index + 1) % SPEEDS.len();
        self.status = format!("Time runs at {}x.", self.speed());
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // prompt + journal
            Constraint::Length(7), // pain report
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    render_header(f, outer[0], app);

    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[1]);

    render_prompt(f, mid[0], app);
    render_journal(f, mid[1], app);
    render_pain_report(f, outer[2], app);
    render_footer(f, outer[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let phase = app.session.sequencer().phase();

    let mut spans = vec![
        Span::styled("CareCue Check-in    ", title_style),
        Span::styled(format!("{}  ", Local::now().format("%H:%M:%S")), dim),
        Span::raw(format!("t={}  ", clock_label(app.session.now_ms()))),
        Span::styled(format!("{}x  ", app.speed()), dim),
        Span::raw("phase: "),
        Span::styled(phase.to_string(), Style::default().fg(phase_color(phase)).add_modifier(Modifier::BOLD)),
    ];
    if let Some(ms) = app.session.next_timer_in_ms() {
        spans.push(Span::styled(format!("   next timer in {}", clock_label(ms)), dim));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(panel("")), area);
}

fn render_prompt(f: &mut Frame, area: Rect, app: &App) {
    let sequencer = app.session.sequencer();
    let mut lines: Vec<Line> = Vec::new();

    match (sequencer.phase(), app.session.surfaces().visible_prompt()) {
        (SequencerPhase::Showing, Some(prompt)) => {
            lines.push(Line::from(Span::styled(
                prompt.question.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for (i, option) in prompt.options.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  [{}] ", i + 1), Style::default().fg(Color::Cyan)),
                    Span::raw(option.clone()),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("  [Esc] not now", Style::default().fg(Color::DarkGray))));
        }
        (SequencerPhase::Responded, _) => {
            lines.push(Line::from(Span::styled(
                "Thanks for checking in!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        }
        (SequencerPhase::Waiting, _) => {
            let upcoming = sequencer.current_prompt().map(|p| p.id.to_string()).unwrap_or_default();
            lines.push(Line::from(format!("Next check-in: {}", upcoming)));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "No check-in scheduled.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let answered = sequencer.responses();
    if !answered.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Answers so far:", Style::default().fg(Color::DarkGray))));
        for r in answered {
            lines.push(Line::from(format!(
                "  {:<11} {}",
                r.prompt_id.as_str(),
                r.response.as_deref().unwrap_or("(not now)")
            )));
        }
    }

    let block = panel(" Check-in ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_journal(f: &mut Frame, area: Rect, app: &App) {
    let log = app.session.journal().export_log();
    let room = area.height.saturating_sub(4) as usize;
    let start = log.events.len().saturating_sub(room);

    let mut items: Vec<ListItem> = log.events[start..].iter().map(journal_line).collect();
    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "  Nothing recorded yet",
            Style::default().fg(Color::DarkGray),
        )));
    }

    items.push(ListItem::new(""));
    let (label, color) = if app.session.journal().verify_integrity() {
        ("  Chain integrity: VERIFIED", Color::Green)
    } else {
        ("  Chain integrity: FAILED", Color::Red)
    };
    items.push(ListItem::new(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));

    let block = panel(" Session Journal ");
    f.render_widget(List::new(items).block(block), area);
}

fn journal_line(event: &JournalEvent) -> ListItem<'static> {
    let entry = &event.record.entry;
    let color = match entry {
        JournalEntry::Escalated { .. } => Color::Red,
        JournalEntry::PromptRejected { .. } | JournalEntry::SequenceStopped { .. } => Color::Yellow,
        JournalEntry::Deescalated { .. } | JournalEntry::SequenceComplete { .. } => Color::Green,
        _ => Color::Gray,
    };
    let detail = match entry {
        JournalEntry::PromptShown { prompt_id } => prompt_id.to_string(),
        JournalEntry::PromptAnswered { prompt_id, response } => {
            format!("{} = {}", prompt_id, response.as_deref().unwrap_or("-"))
        }
        JournalEntry::PromptRejected { prompt_id, option } => format!("{} ≠ {}", prompt_id, option),
        JournalEntry::SequenceComplete { answered, dismissed } => {
            format!("{} answered, {} dismissed", answered, dismissed)
        }
        JournalEntry::SequenceStopped { queue_index } => format!("at {:?}", queue_index),
        JournalEntry::Escalated { tier, value } => format!("{} ({})", tier, value),
        JournalEntry::Deescalated { value } => format!("back to {}", value),
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("  #{:<3}", event.sequence), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{} ", clock_label(event.record.at_ms)), Style::default().fg(Color::DarkGray)),
        Span::styled(entry.kind(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} ", truncate(&detail, 28))),
        Span::styled(shorten_hash(&event.this_hash), Style::default().fg(Color::DarkGray)),
    ]))
}

fn render_pain_report(f: &mut Frame, area: Rect, app: &App) {
    let guard = app.session.guard();
    let tier = guard.settings().thresholds.classify(app.slider as u8);

    let filled = app.slider as usize;
    let empty = usize::from(SEVERITY_MAX) - filled;
    let mut lines = vec![Line::from(vec![
        Span::raw("  Pain  "),
        Span::styled("■".repeat(filled), Style::default().fg(tier_color(tier))),
        Span::styled("□".repeat(empty), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  {:>2}  {}", app.slider, tier),
            Style::default().fg(tier_color(tier)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if guard.is_settling() { "  (settling…)" } else { "" },
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    lines.push(Line::from(""));

    match (guard.last_escalated_tier(), app.session.surfaces().last_escalation()) {
        (Some(_), Some((tier, value, contact))) => {
            lines.push(Line::from(Span::styled(
                format!("  ⚠ {} pain ({}): contact {} now", tier, value, contact.label),
                Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("    call {}  or message #{}", contact.phone, contact.channel)));
        }
        _ => lines.push(Line::from(Span::styled(
            "  No urgent contact needed.",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let block = panel(" Pain Report ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Cyan);
    let spans = vec![
        Span::styled(" [s] ", key),
        Span::raw("start  "),
        Span::styled("[1-9] ", key),
        Span::raw("answer  "),
        Span::styled("[Esc] ", key),
        Span::raw("not now  "),
        Span::styled("[x] ", key),
        Span::raw("stop  "),
        Span::styled("[←/→] ", key),
        Span::raw("pain  "),
        Span::styled("[Enter] ", key),
        Span::raw("submit  "),
        Span::styled("[n] ", key),
        Span::raw("new report  "),
        Span::styled("[e] ", key),
        Span::raw("export  "),
        Span::styled("[t] ", key),
        Span::raw("speed  "),
        Span::styled("[q] ", key),
        Span::raw("quit   "),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
    ];

    f.render_widget(Paragraph::new(Line::from(spans)).block(panel("")), area);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Bordered panel in the session's muted frame colour.
fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn phase_color(phase: SequencerPhase) -> Color {
    match phase {
        SequencerPhase::Idle => Color::DarkGray,
        SequencerPhase::Waiting => Color::Yellow,
        SequencerPhase::Showing => Color::Cyan,
        SequencerPhase::Responded => Color::Green,
    }
}

fn tier_color(tier: SeverityTier) -> Color {
    match tier {
        SeverityTier::Normal => Color::Green,
        SeverityTier::Elevated => Color::Yellow,
        SeverityTier::Critical => Color::Red,
    }
}

/// Whole milliseconds from `*last_tick` to `now`. `last_tick` moves forward
/// by exactly that amount, so the sub-millisecond remainder carries over to
/// the next tick.
fn take_whole_millis(last_tick: &mut Instant, now: Instant) -> u64 {
    let elapsed_ms = now.saturating_duration_since(*last_tick).as_millis() as u64;
    *last_tick += Duration::from_millis(elapsed_ms);
    elapsed_ms
}

/// `mm:ss` on the simulated clock.
fn clock_label(ms: u64) -> String {
    format!("{:02}:{:02}", ms / 60_000, (ms / 1_000) % 60)
}

/// Truncate to at most `max` chars, appending "…" if cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// "xxxx..xxxx" from a 64-hex-char hash.
fn shorten_hash(h: &str) -> String {
    if h.len() >= 8 {
        format!("{}..{}", &h[..4], &h[h.len() - 4..])
    } else {
        h.to_string()
    }
}

// ── Logging / configuration ───────────────────────────────────────────────────

/// Log to the file named by `CARECUE_LOG`, if set. Logging to the terminal
/// would tear the alternate screen.
fn init_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os("CARECUE_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// First argument, if any, is a TOML configuration file.
fn load_config() -> CareResult<CareCueConfig> {
    match std::env::args().nth(1) {
        Some(path) => CareCueConfig::from_file(Path::new(&path)),
        None => default_config(),
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    init_logging()?;

    // Fail before touching the terminal so the error stays readable.
    let mut app = match load_config().and_then(App::new) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("carecue-tui: {}", e);
            std::process::exit(1);
        }
    };

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    loop {
        app.tick();
        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Let pending timers land before acting on the key.
        app.tick();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,

            KeyCode::Char('s') => app.start(),
            KeyCode::Char(c @ '1'..='9') => app.respond(c as usize - '1' as usize),
            KeyCode::Esc => app.dismiss(),
            KeyCode::Char('x') => app.stop(),

            KeyCode::Left => app.move_slider(-1),
            KeyCode::Right => app.move_slider(1),
            KeyCode::Enter => app.submit(),
            KeyCode::Char('n') => app.new_report(),

            KeyCode::Char('e') => app.export_journal(),
            KeyCode::Char('t') => app.cycle_speed(),
            _ => {}
        }
    }

    restore_terminal(&mut terminal)?;

    if let Ok(log) = app.session.end() {
        println!(
            "Session {} closed: {} journal record(s), terminal hash {}",
            app.session.id(),
            log.events.len(),
            shorten_hash(&log.terminal_hash)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Simulated time ───────────────────────────────────────────────────────

    #[test]
    fn test_sub_millisecond_remainder_carries_over() {
        let start = Instant::now();
        let mut last_tick = start;

        // Ten polls 1.5 ms apart: 15 ms of wall time must become 15 ms of
        // simulated time, not 10.
        let total: u64 = (1..=10)
            .map(|i| take_whole_millis(&mut last_tick, start + Duration::from_micros(1_500 * i)))
            .sum();

        assert_eq!(total, 15);
        assert_eq!(last_tick, start + Duration::from_millis(15));
    }

    #[test]
    fn test_poll_within_one_millisecond_consumes_nothing() {
        let start = Instant::now();
        let mut last_tick = start;

        assert_eq!(take_whole_millis(&mut last_tick, start + Duration::from_micros(900)), 0);
        assert_eq!(last_tick, start);
    }

    // ── Formatting helpers ───────────────────────────────────────────────────

    #[test]
    fn test_clock_label_and_hash_shortening() {
        assert_eq!(clock_label(111_200), "01:51");
        assert_eq!(shorten_hash(&"ab".repeat(32)), "abab..abab");
        assert_eq!(truncate("medication = Taken", 8), "medicat…");
    }
}
