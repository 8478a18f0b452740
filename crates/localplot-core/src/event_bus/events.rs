//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed
//! into the console view.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::geometry::Rect;

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Drawing file load/remove
    File(FileEvent),
    /// Sheet layout and auto-arrange progress
    Layout(LayoutEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::File(_) => EventCategory::File,
            AppEvent::Layout(_) => EventCategory::Layout,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::File(e) => e.description(),
            AppEvent::Layout(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Drawing file events.
    File,
    /// Layout events.
    Layout,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::File => write!(f, "File"),
            EventCategory::Layout => write!(f, "Layout"),
        }
    }
}

/// Severity of a console status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusLevel {
    /// Normal progress message.
    #[default]
    Info,
    /// The user stopped something.
    Warning,
    /// The operation gave up.
    Error,
}

impl StatusLevel {
    /// Console text color for this level, as `#rrggbb`
    pub fn color(&self) -> &'static str {
        match self {
            StatusLevel::Info => "#000000",
            StatusLevel::Warning => "#8b0000",
            StatusLevel::Error => "#ff0000",
        }
    }
}

/// Drawing file events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileEvent {
    /// A drawing was added to the store.
    Loaded {
        /// Store identity of the new entry.
        entry: u64,
        /// Source file path.
        path: PathBuf,
    },
}

impl FileEvent {
    fn description(&self) -> String {
        match self {
            FileEvent::Loaded { entry, path } => {
                format!("Loaded #{}: {}", entry, path.display())
            }
        }
    }
}

/// Layout events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayoutEvent {
    /// Auto-arrange started.
    ArrangeStarted {
        /// Number of entries in the store at start.
        entries: usize,
    },
    /// A placement was applied to an entry.
    Placed {
        /// Store identity of the placed entry.
        entry: u64,
        /// Placement in sheet coordinates.
        rect: Rect,
    },
    /// A console status line.
    Status {
        /// Human-readable message.
        message: String,
        /// Severity, mapped to a console color.
        level: StatusLevel,
    },
    /// Auto-arrange reached a terminal state.
    ArrangeFinished {
        /// Short outcome summary.
        outcome: String,
    },
}

impl LayoutEvent {
    fn description(&self) -> String {
        match self {
            LayoutEvent::ArrangeStarted { entries } => {
                format!("Arranging {} drawings", entries)
            }
            LayoutEvent::Placed { entry, rect } => format!("Placed #{} at {}", entry, rect),
            LayoutEvent::Status { message, level } => format!("{:?}: {}", level, message),
            LayoutEvent::ArrangeFinished { outcome } => format!("Arrange finished: {}", outcome),
        }
    }
}
