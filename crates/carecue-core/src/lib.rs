//! # carecue-core
//!
//! Host-agnostic building blocks shared by the CareCue controllers:
//!
//! - the four boundary traits (`Clock`, `PromptSurface`, `EscalationSurface`,
//!   `JournalWriter`)
//! - `ManualClock`, a deterministic clock for tests and simulated hosts
//! - `TimerSlot`, which enforces one outstanding timer per controller
//! - `Debouncer`, the trailing-edge coalescing used by the severity guard
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use carecue_core::{ManualClock, traits::Clock};
//!
//! let clock: Arc<dyn Clock> = Arc::new(ManualClock::new());
//! ```

pub mod clock;
pub mod debounce;
pub mod journal;
pub mod timer;
pub mod traits;

pub use clock::ManualClock;
pub use debounce::Debouncer;
pub use journal::JournalHandle;
pub use timer::TimerSlot;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use carecue_contracts::{
        error::{CareError, CareResult},
        journal::{JournalEntry, JournalRecord},
        prompt::PromptId,
    };

    use crate::{traits::JournalWriter, JournalHandle};

    /// A writer that records every call, or fails every call.
    struct MockJournal {
        records: Arc<Mutex<Vec<JournalRecord>>>,
        fail: bool,
    }

    impl JournalWriter for MockJournal {
        fn write(&self, record: &JournalRecord) -> CareResult<()> {
            if self.fail {
                return Err(CareError::JournalWriteFailed { reason: "disk full".to_string() });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn finalize(&self, _session_id: &str) -> CareResult<()> {
            Ok(())
        }
    }

    #[test]
    fn attached_handle_forwards_records() {
        let records = Arc::new(Mutex::new(vec![]));
        let handle = JournalHandle::attached(Box::new(MockJournal {
            records: records.clone(),
            fail: false,
        }));

        handle.append(42, JournalEntry::PromptShown { prompt_id: PromptId::new("mood") });

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].at_ms, 42);
    }

    #[test]
    fn failing_writer_does_not_propagate() {
        let handle = JournalHandle::attached(Box::new(MockJournal {
            records: Arc::new(Mutex::new(vec![])),
            fail: true,
        }));

        // Must not panic or return anything the caller has to handle.
        handle.append(0, JournalEntry::Deescalated { value: 2 });
    }

    #[test]
    fn arc_forwarding_keeps_an_inspectable_handle() {
        let shared = Arc::new(MockJournal {
            records: Arc::new(Mutex::new(vec![])),
            fail: false,
        });
        let handle = JournalHandle::attached(Box::new(Arc::clone(&shared)));

        handle.append(1, JournalEntry::Deescalated { value: 3 });
        assert_eq!(shared.records.lock().unwrap().len(), 1);
    }
}
