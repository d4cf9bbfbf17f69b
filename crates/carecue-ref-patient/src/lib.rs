//! # carecue-ref-patient
//!
//! Reference host for the CareCue prompt scheduler: a simulated patient app
//! with a check-in modal and a pain-report slider.
//!
//! Demonstrates three scenarios using mock data:
//!
//! 1. **Check-in sequence**: prompts appear one at a time, answers are
//!    recorded, an invalid option is rejected and retried.
//! 2. **Pain escalation**: slider drags are debounced into a single urgent
//!    contact per rise in tier, and easing back to normal re-arms the guard.
//! 3. **Teardown**: stopping mid-sequence cancels timers synchronously, stale
//!    deliveries are ignored, and the journal is sealed.
//!
//! All data is hardcoded and fictional. Time is simulated with `ManualClock`,
//! so every scenario runs instantly.

pub mod mock_data;
pub mod scenarios;
pub mod session;
pub mod surfaces;

pub use session::PatientSession;
pub use surfaces::{SurfaceEvent, SurfaceLog};
