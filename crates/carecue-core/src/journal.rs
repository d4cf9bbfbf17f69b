//! Optional journal attachment for controllers.

use tracing::warn;

use carecue_contracts::journal::{JournalEntry, JournalRecord};

use crate::traits::JournalWriter;

/// A controller's link to the session journal, if one is attached.
///
/// A failed append is logged and swallowed: the journal observes decisions,
/// it never vetoes them.
#[derive(Default)]
pub struct JournalHandle {
    writer: Option<Box<dyn JournalWriter>>,
}

impl JournalHandle {
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attached(writer: Box<dyn JournalWriter>) -> Self {
        Self { writer: Some(writer) }
    }

    pub fn is_attached(&self) -> bool {
        self.writer.is_some()
    }

    pub fn append(&self, at_ms: u64, entry: JournalEntry) {
        let Some(writer) = &self.writer else {
            return;
        };
        let record = JournalRecord::new(at_ms, entry);
        if let Err(e) = writer.write(&record) {
            warn!(kind = record.entry.kind(), error = %e, "journal append failed");
        }
    }
}
