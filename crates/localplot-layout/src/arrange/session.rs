//! Caller side of an arrange run.
//!
//! Starts the job on its worker thread, applies each placement to the store
//! as it arrives, and relays everything to the application event bus.

use super::config::ArrangeConfig;
use super::events::{ArrangeEvent, ArrangeOutcome};
use super::job::{ArrangeJob, CancelToken};
use crate::error::LayoutResult;
use crate::store::{EntryId, ItemStore};
use localplot_core::{AppEvent, EventBus, LayoutEvent, Rect};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrangeReport {
    pub outcome: ArrangeOutcome,
    /// Placements in the order they were applied.
    pub placements: Vec<(EntryId, Rect)>,
    /// Status lines shown during the run.
    pub messages: Vec<String>,
}

/// Drives one arrange run from a synchronous caller
pub struct ArrangeSession<'a> {
    store: Arc<ItemStore>,
    config: ArrangeConfig,
    bus: Option<&'a EventBus>,
    cancel: CancelToken,
}

impl<'a> ArrangeSession<'a> {
    pub fn new(store: Arc<ItemStore>, config: ArrangeConfig) -> Self {
        Self {
            store,
            config,
            bus: None,
            cancel: CancelToken::new(),
        }
    }

    /// Relay progress to an event bus
    pub fn with_event_bus(mut self, bus: &'a EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this session's run
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run to the end, blocking the current thread.
    ///
    /// Must not be called from inside an async runtime.
    pub fn run(self) -> LayoutResult<ArrangeReport> {
        let (job, mut events) = ArrangeJob::new(self.store.clone(), self.config.clone())?;
        let job = job.with_cancel_token(self.cancel.clone());

        self.publish(AppEvent::Layout(LayoutEvent::ArrangeStarted {
            entries: self.store.len(),
        }));
        let handle = job.spawn()?;

        let mut placements = Vec::new();
        let mut messages = Vec::new();
        while let Some(event) = events.recv_blocking() {
            let finished = match &event {
                ArrangeEvent::PlacementComputed { entry, rect } => {
                    if let Err(e) = self.store.apply_placement(*entry, rect) {
                        warn!("Failed to apply placement for {}: {}", entry, e);
                    }
                    placements.push((*entry, *rect));
                    false
                }
                ArrangeEvent::Status { message, .. } => {
                    messages.push(message.clone());
                    false
                }
                ArrangeEvent::Finished(_) => true,
            };
            self.publish(event.to_app_event());
            if finished {
                break;
            }
        }

        let outcome = handle.join()?;
        Ok(ArrangeReport {
            outcome,
            placements,
            messages,
        })
    }

    fn publish(&self, event: AppEvent) {
        if let Some(bus) = self.bus {
            bus.publish(event);
        }
    }
}
