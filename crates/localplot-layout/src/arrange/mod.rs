//! Auto arrange: pack every loaded drawing onto the sheet.
//!
//! [`ArrangeJob`] does the work and reports through [`ArrangeEvents`];
//! [`ArrangeSession`] is the usual way to drive one from synchronous code.

mod config;
mod events;
mod job;
mod session;

pub use config::{ArrangeConfig, ReferenceLine};
pub use events::{ArrangeEvent, ArrangeEvents, ArrangeOutcome, ArrangeState};
pub use job::{accumulated_extent, ArrangeHandle, ArrangeJob, CancelToken};
pub use session::{ArrangeReport, ArrangeSession};
