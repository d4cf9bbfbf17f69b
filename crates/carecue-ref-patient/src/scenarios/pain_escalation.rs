//! Scenario 2: Pain Escalation
//!
//! Replays scripted slider drags on the pain-report form:
//!
//!   a. Flare: 3 → 5 → 8 → 9 inside one 300 ms window. Only the settled 9 is
//!      evaluated, so the on-call clinician is surfaced once and the nurse
//!      line never appears.
//!   b. Submit right after the flare: nothing is pending, nothing fires.
//!   c. Easing back to 2 re-arms the guard without an effect.
//!   d. Slow rise 6 → 7 → 8 → 8, settling each time: the nurse line appears
//!      once; holding at 8 does not repeat it.
//!   e. A fumbled drag past both ends of the scale is clamped to 0 and 10.
//!      Critical is a rise over Elevated, so it fires.

use carecue_contracts::{error::CareResult, severity::EscalationTier};

use crate::{
    mock_data::{easing_drag, flare_drag, overshoot_drag, slow_rise_to_elevated, SliderStep},
    scenarios::{clock_label, print_journal_summary},
    session::PatientSession,
};

/// Feed `drag` to the slider, then let the last value settle. Returns the
/// escalations the drag produced.
fn replay(session: &mut PatientSession, drag: &[SliderStep]) -> Vec<(EscalationTier, u8)> {
    let before = session.surfaces().escalations().len();
    for step in drag {
        session.run_for(step.gap_ms);
        let tier = session.report_severity(step.value);
        println!(
            "    {}  slider → {:>2}  (live tier: {})",
            clock_label(session.now_ms()),
            step.value,
            tier
        );
    }
    let settle = session.guard().settings().debounce_ms;
    session.run_for(settle);
    session.surfaces().escalations().split_off(before)
}

fn print_fired(fired: &[(EscalationTier, u8)]) {
    if fired.is_empty() {
        println!("    => no escalation");
    }
    for (tier, value) in fired {
        let contact = crate::mock_data::urgent_contact(*tier);
        println!(
            "    => ESCALATE {} at {}: {} ({}, #{})",
            tier, value, contact.label, contact.phone, contact.channel
        );
    }
    println!();
}

pub fn run_scenario() -> CareResult<()> {
    println!("=== Scenario 2: Pain Escalation ===");
    println!();

    let mut session = crate::mock_data::default_config().and_then(PatientSession::new)?;
    let thresholds = session.guard().settings().thresholds;
    println!(
        "  Thresholds: elevated >= {}, critical >= {}; debounce {} ms",
        thresholds.elevated,
        thresholds.critical,
        session.guard().settings().debounce_ms
    );
    println!();

    println!("  a. Flare drag within one debounce window");
    let fired = replay(&mut session, &flare_drag());
    print_fired(&fired);

    println!("  b. Report submitted");
    match session.submit_report() {
        Some(tier) => println!("    => submit fired {} (unexpected)", tier),
        None => println!("    => submit found nothing pending; no second interruption"),
    }
    println!();

    println!("  c. Easing off");
    let fired = replay(&mut session, &easing_drag());
    print_fired(&fired);
    println!(
        "    guard memory after easing: {:?}",
        session.guard().last_escalated_tier()
    );
    println!();

    println!("  d. Slow rise, settling at every step");
    let mut fired = Vec::new();
    for step in slow_rise_to_elevated() {
        fired.extend(replay(&mut session, &[step]));
    }
    print_fired(&fired);

    println!("  e. Overshooting the scale");
    let fired = replay(&mut session, &overshoot_drag());
    print_fired(&fired);

    let log = session.end()?;
    println!(
        "  Escalations: {}  De-escalations: {}",
        log.count_kind("escalated"),
        log.count_kind("deescalated")
    );
    print_journal_summary(session.journal());
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use carecue_contracts::severity::{EscalationTier, SeverityTier};

    use super::*;
    use crate::mock_data::default_config;

    fn session() -> PatientSession {
        PatientSession::new(default_config().unwrap()).unwrap()
    }

    #[test]
    fn test_flare_fires_critical_once_and_never_elevated() {
        let mut s = session();
        let fired = replay(&mut s, &flare_drag());
        assert_eq!(fired, vec![(EscalationTier::Critical, 9)]);
    }

    #[test]
    fn test_easing_rearms_and_next_flare_fires_again() {
        let mut s = session();
        replay(&mut s, &flare_drag());
        assert!(replay(&mut s, &easing_drag()).is_empty());
        assert_eq!(s.guard().last_escalated_tier(), None);

        let fired = replay(&mut s, &flare_drag());
        assert_eq!(fired, vec![(EscalationTier::Critical, 9)]);
    }

    #[test]
    fn test_holding_elevated_fires_once() {
        let mut s = session();
        let mut fired = Vec::new();
        for step in slow_rise_to_elevated() {
            fired.extend(replay(&mut s, &[step]));
        }
        assert_eq!(fired, vec![(EscalationTier::Elevated, 7)]);
        assert_eq!(s.guard().tier(), SeverityTier::Elevated);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let mut s = session();
        let fired = replay(&mut s, &overshoot_drag());
        assert_eq!(fired, vec![(EscalationTier::Critical, 10)]);
        assert_eq!(s.guard().current_value(), Some(10));
    }

    #[test]
    fn test_urgent_contact_follows_tier() {
        let mut s = session();
        replay(&mut s, &[SliderStep { gap_ms: 0, value: 7 }]);
        replay(&mut s, &[SliderStep { gap_ms: 0, value: 9 }]);

        let (tier, _, contact) = s.surfaces().last_escalation().unwrap();
        assert_eq!(tier, EscalationTier::Critical);
        assert_eq!(contact.channel, "on-call-urgent");
    }

    #[test]
    fn test_run_scenario_succeeds() {
        assert!(run_scenario().is_ok());
    }
}
