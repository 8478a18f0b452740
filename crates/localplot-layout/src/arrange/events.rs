//! Messages from the arrange job to its caller, and run outcomes.

use crate::store::EntryId;
use localplot_core::{AppEvent, LayoutEvent, Rect, StatusLevel};
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;

/// Lifecycle of one arrange run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrangeState {
    Idle,
    Sizing,
    Packing,
    Completed,
    Cancelled,
    Failed,
}

impl ArrangeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ArrangeState::Completed | ArrangeState::Cancelled | ArrangeState::Failed
        )
    }
}

impl fmt::Display for ArrangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrangeState::Idle => write!(f, "idle"),
            ArrangeState::Sizing => write!(f, "sizing"),
            ArrangeState::Packing => write!(f, "packing"),
            ArrangeState::Completed => write!(f, "completed"),
            ArrangeState::Cancelled => write!(f, "cancelled"),
            ArrangeState::Failed => write!(f, "failed"),
        }
    }
}

/// How a run ended.
///
/// Placements emitted before a failure stay valid; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrangeOutcome {
    /// Every entry was placed. `sheet` is the bin in the caller's frame.
    Completed { placed: usize, sheet: Rect },
    /// The user cancelled after `placed` placements.
    Cancelled { placed: usize },
    /// The entry was locked by someone else.
    LockContention { entry: EntryId },
    /// The entry had no drawing group, could not be measured, or vanished
    /// from the store.
    InvalidEntryState { entry: EntryId },
    /// The entry is larger than the sheet in every allowed orientation.
    DoesNotFit {
        entry: EntryId,
        width: f64,
        height: f64,
    },
}

impl ArrangeOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ArrangeOutcome::Completed { .. })
    }

    pub fn terminal_state(&self) -> ArrangeState {
        match self {
            ArrangeOutcome::Completed { .. } => ArrangeState::Completed,
            ArrangeOutcome::Cancelled { .. } => ArrangeState::Cancelled,
            _ => ArrangeState::Failed,
        }
    }

    /// The console line announcing this outcome
    pub fn status_line(&self) -> (String, StatusLevel) {
        match self {
            ArrangeOutcome::Completed { .. } => {
                ("Finished arranging files.".to_string(), StatusLevel::Info)
            }
            ArrangeOutcome::Cancelled { .. } => {
                ("Cancelling auto arrange.".to_string(), StatusLevel::Warning)
            }
            ArrangeOutcome::LockContention { entry } => (
                format!("Drawing {} is busy, auto arrange gave up.", entry),
                StatusLevel::Error,
            ),
            ArrangeOutcome::InvalidEntryState { entry } => (
                format!("Drawing {} has no usable geometry, auto arrange gave up.", entry),
                StatusLevel::Error,
            ),
            ArrangeOutcome::DoesNotFit {
                entry,
                width,
                height,
            } => (
                format!(
                    "Drawing {} ({:.0} x {:.0}) does not fit on the sheet.",
                    entry, width, height
                ),
                StatusLevel::Error,
            ),
        }
    }
}

impl fmt::Display for ArrangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrangeOutcome::Completed { placed, .. } => write!(f, "completed ({} placed)", placed),
            ArrangeOutcome::Cancelled { placed } => write!(f, "cancelled ({} placed)", placed),
            ArrangeOutcome::LockContention { entry } => write!(f, "{} locked", entry),
            ArrangeOutcome::InvalidEntryState { entry } => write!(f, "{} invalid", entry),
            ArrangeOutcome::DoesNotFit { entry, .. } => write!(f, "{} does not fit", entry),
        }
    }
}

/// A message from the arrange job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrangeEvent {
    /// Where an entry should go, in the caller's frame.
    PlacementComputed { entry: EntryId, rect: Rect },
    /// A console line.
    Status { message: String, level: StatusLevel },
    /// Terminal message; sent exactly once per run.
    Finished(ArrangeOutcome),
}

impl ArrangeEvent {
    /// The application-bus form of this event
    pub fn to_app_event(&self) -> AppEvent {
        let layout = match self {
            ArrangeEvent::PlacementComputed { entry, rect } => LayoutEvent::Placed {
                entry: entry.value(),
                rect: *rect,
            },
            ArrangeEvent::Status { message, level } => LayoutEvent::Status {
                message: message.clone(),
                level: *level,
            },
            ArrangeEvent::Finished(outcome) => LayoutEvent::ArrangeFinished {
                outcome: outcome.to_string(),
            },
        };
        AppEvent::Layout(layout)
    }
}

/// Caller side of the job's event channel
#[derive(Debug)]
pub struct ArrangeEvents {
    rx: mpsc::UnboundedReceiver<ArrangeEvent>,
}

impl ArrangeEvents {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<ArrangeEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Wait for the next event. `None` once the job is gone and the queue is empty.
    ///
    /// Blocks the thread; call from synchronous code only.
    pub fn recv_blocking(&mut self) -> Option<ArrangeEvent> {
        self.rx.blocking_recv()
    }

    /// Next event if one is queued
    pub fn try_recv(&mut self) -> Option<ArrangeEvent> {
        self.rx.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<ArrangeEvent> {
        self.rx.recv().await
    }

    /// Collect everything up to and including `Finished`
    pub fn drain_blocking(&mut self) -> Vec<ArrangeEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.recv_blocking() {
            let done = matches!(event, ArrangeEvent::Finished(_));
            events.push(event);
            if done {
                break;
            }
        }
        events
    }
}
