//! Recording host surfaces.
//!
//! Stand-ins for the patient app's check-in modal and urgent-contact banner.
//! Both write into one shared `SurfaceLog`, which the scenarios print and the
//! TUI renders from.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use carecue_contracts::{prompt::PromptDefinition, severity::EscalationTier};
use carecue_core::traits::{EscalationSurface, PromptSurface};

use crate::mock_data::{urgent_contact, UrgentContact};

/// Something the patient would have seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    PromptShown(PromptDefinition),
    PromptHidden { confirmed: bool },
    Escalated {
        tier: EscalationTier,
        value: u8,
        contact: UrgentContact,
    },
}

/// Shared, append-only list of surface events.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl SurfaceLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SurfaceEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: SurfaceEvent) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The prompt currently on screen: the last one shown, unless a hide
    /// came after it.
    pub fn visible_prompt(&self) -> Option<PromptDefinition> {
        match self.lock().iter().rev().find(|e| !matches!(e, SurfaceEvent::Escalated { .. })) {
            Some(SurfaceEvent::PromptShown(prompt)) => Some(prompt.clone()),
            _ => None,
        }
    }

    /// Ids of every prompt shown, in order.
    pub fn shown_prompt_ids(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::PromptShown(p) => Some(p.id.0.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every escalation fired, in order.
    pub fn escalations(&self) -> Vec<(EscalationTier, u8)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Escalated { tier, value, .. } => Some((*tier, *value)),
                _ => None,
            })
            .collect()
    }

    /// The most recent escalation banner.
    pub fn last_escalation(&self) -> Option<(EscalationTier, u8, UrgentContact)> {
        self.lock().iter().rev().find_map(|e| match e {
            SurfaceEvent::Escalated { tier, value, contact } => Some((*tier, *value, contact.clone())),
            _ => None,
        })
    }
}

/// The check-in modal.
pub struct RecordingPromptSurface {
    log: SurfaceLog,
}

impl RecordingPromptSurface {
    pub fn new(log: SurfaceLog) -> Self {
        Self { log }
    }
}

impl PromptSurface for RecordingPromptSurface {
    fn show_prompt(&self, prompt: &PromptDefinition) {
        self.log.push(SurfaceEvent::PromptShown(prompt.clone()));
    }

    fn hide_prompt(&self, confirmed: bool) {
        self.log.push(SurfaceEvent::PromptHidden { confirmed });
    }
}

/// The urgent-contact banner. Resolves the contact from the mock directory.
pub struct RecordingEscalationSurface {
    log: SurfaceLog,
}

impl RecordingEscalationSurface {
    pub fn new(log: SurfaceLog) -> Self {
        Self { log }
    }
}

impl EscalationSurface for RecordingEscalationSurface {
    fn escalate(&self, tier: EscalationTier, value: u8) {
        let contact = urgent_contact(tier);
        info!(tier = %tier, value, contact = contact.label, "urgent contact surfaced");
        self.log.push(SurfaceEvent::Escalated { tier, value, contact });
    }
}
