//! The auto-arrange job.
//!
//! Two passes over the store in its sorted order. The sizing pass adds up
//! every entry's longest side to get a bin height that cannot run out. The
//! packing pass feeds each bounding box to the packer and reports where it
//! landed. Each entry is try-locked for the duration of its step only, and
//! the cancel flag is checked before every entry.
//!
//! The packer works in a frame whose x axis is the display y axis, so every
//! packed rectangle is transposed before it is reported.

use super::config::ArrangeConfig;
use super::events::{ArrangeEvent, ArrangeEvents, ArrangeOutcome, ArrangeState};
use crate::error::{LayoutError, LayoutResult};
use crate::group::ItemGroup;
use crate::packer::{RectPacker, ShelfPacker};
use crate::store::{EntryGuard, EntryId, ItemStore};
use localplot_core::{thread_safe, ProgressCallback, Rect, StatusLevel, ThreadSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

/// Shared cancel request flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the job to stop before its next entry
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Packer extent one bounding box needs along the open bin axis
fn entry_extent(bounds: &Rect, spacing: f64) -> f64 {
    bounds.longest_side() + spacing
}

/// Bin height that fits every box in any orientation.
///
/// Sum of each box's longest side plus `spacing` per box.
pub fn accumulated_extent<'a>(bounds: impl IntoIterator<Item = &'a Rect>, spacing: f64) -> f64 {
    bounds
        .into_iter()
        .map(|b| entry_extent(b, spacing))
        .sum()
}

/// One auto-arrange run over a store
pub struct ArrangeJob<P = ShelfPacker> {
    store: Arc<ItemStore>,
    config: ArrangeConfig,
    packer: P,
    cancel: CancelToken,
    events: UnboundedSender<ArrangeEvent>,
    state: ThreadSafe<ArrangeState>,
    progress: Option<ProgressCallback>,
}

impl ArrangeJob<ShelfPacker> {
    /// Create a job using the shelf packer, plus the receiver for its events
    pub fn new(
        store: Arc<ItemStore>,
        config: ArrangeConfig,
    ) -> LayoutResult<(Self, ArrangeEvents)> {
        Self::with_packer(store, config, ShelfPacker::default())
    }
}

impl<P: RectPacker> ArrangeJob<P> {
    pub fn with_packer(
        store: Arc<ItemStore>,
        config: ArrangeConfig,
        packer: P,
    ) -> LayoutResult<(Self, ArrangeEvents)> {
        config.validate()?;
        let (events, receiver) = ArrangeEvents::channel();
        let job = Self {
            store,
            config,
            packer,
            cancel: CancelToken::new(),
            events,
            state: thread_safe(ArrangeState::Idle),
            progress: None,
        };
        Ok((job, receiver))
    }

    /// Share an existing cancel flag instead of a fresh one
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Report `(done, total)` steps, one per entry sized and one per entry
    /// packed. Called on the job's thread.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &ArrangeConfig {
        &self.config
    }

    pub fn state(&self) -> ArrangeState {
        *self.state.lock()
    }

    /// Run to completion on the current thread.
    ///
    /// Emits one `Finished` event carrying the same outcome it returns.
    pub fn run(mut self) -> ArrangeOutcome {
        let outcome = self.arrange();
        self.finish(&outcome);
        outcome
    }

    /// Run on a dedicated worker thread
    pub fn spawn(self) -> LayoutResult<ArrangeHandle>
    where
        P: Send + 'static,
    {
        let cancel = self.cancel.clone();
        let state = self.state.clone();
        let thread = std::thread::Builder::new()
            .name("auto-arrange".to_string())
            .spawn(move || self.run())?;
        Ok(ArrangeHandle {
            thread,
            cancel,
            state,
        })
    }

    fn arrange(&mut self) -> ArrangeOutcome {
        self.store.sort_stable(self.config.sort_order);
        let ids = self.store.ids();
        let steps = 2 * ids.len();
        let spacing = self.config.spacing;
        info!(
            "Auto arrange: {} entries, sheet width {}",
            ids.len(),
            self.config.bin_width
        );

        self.set_state(ArrangeState::Sizing);
        let mut bin_height = 0.0;
        for (sized, &id) in ids.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return ArrangeOutcome::Cancelled { placed: 0 };
            }
            let (guard, bounds) = match self.lock_entry(id) {
                Ok(locked) => locked,
                Err(outcome) => return outcome,
            };
            debug!("Auto arrange: {} bounds {}", id, bounds);
            bin_height += entry_extent(&bounds, spacing);
            drop(guard);
            if !bin_height.is_finite() {
                warn!("Auto arrange: sheet length overflows at {}", id);
                return ArrangeOutcome::InvalidEntryState { entry: id };
            }
            self.report_progress(sized + 1, steps);
        }

        self.packer
            .init(self.config.bin_width, bin_height, self.config.allow_rotation);
        self.set_state(ArrangeState::Packing);

        let mut placed = 0;
        for &id in &ids {
            if self.cancel.is_cancelled() {
                return ArrangeOutcome::Cancelled { placed };
            }
            let (guard, bounds) = match self.lock_entry(id) {
                Ok(locked) => locked,
                Err(outcome) => return outcome,
            };
            let Some(packed) = self.packer.insert(
                bounds.width + spacing,
                bounds.height + spacing,
                self.config.heuristic,
            ) else {
                return ArrangeOutcome::DoesNotFit {
                    entry: id,
                    width: bounds.width,
                    height: bounds.height,
                };
            };
            let rect = packed.transposed().inset(spacing / 2.0);
            debug!("Auto arrange: {} packed at {}, placed at {}", id, packed, rect);
            self.emit(ArrangeEvent::PlacementComputed { entry: id, rect });
            placed += 1;
            drop(guard);
            self.report_progress(ids.len() + placed, steps);
        }

        ArrangeOutcome::Completed {
            placed,
            sheet: Rect::new(0.0, 0.0, self.config.bin_width, bin_height).transposed(),
        }
    }

    /// Try-lock an entry and read its bounding box
    fn lock_entry(&self, id: EntryId) -> Result<(EntryGuard, Rect), ArrangeOutcome> {
        let guard = match self.store.try_lock_group(id) {
            Ok(guard) => guard,
            Err(LayoutError::EntryLocked(_)) => {
                return Err(ArrangeOutcome::LockContention { entry: id })
            }
            Err(_) => return Err(ArrangeOutcome::InvalidEntryState { entry: id }),
        };
        match guard.group().map(ItemGroup::bounding_rect) {
            Some(Ok(bounds)) => Ok((guard, bounds)),
            Some(Err(e)) => {
                warn!("Auto arrange: {} cannot be measured: {}", id, e);
                Err(ArrangeOutcome::InvalidEntryState { entry: id })
            }
            None => Err(ArrangeOutcome::InvalidEntryState { entry: id }),
        }
    }

    fn finish(&self, outcome: &ArrangeOutcome) {
        let (message, level) = outcome.status_line();
        match level {
            StatusLevel::Info => info!("Auto arrange: {} ({})", message, outcome),
            StatusLevel::Warning => warn!("Auto arrange: {} ({})", message, outcome),
            StatusLevel::Error => error!("Auto arrange: {}", message),
        }
        self.emit(ArrangeEvent::Status { message, level });
        self.set_state(outcome.terminal_state());
        self.emit(ArrangeEvent::Finished(outcome.clone()));
    }

    fn report_progress(&self, done: usize, total: usize) {
        if let Some(progress) = &self.progress {
            progress(done as u64, total as u64);
        }
    }

    fn emit(&self, event: ArrangeEvent) {
        if self.events.send(event).is_err() {
            debug!("Auto arrange: event receiver dropped");
        }
    }

    fn set_state(&self, state: ArrangeState) {
        *self.state.lock() = state;
    }
}

/// Handle to a job running on its worker thread
#[derive(Debug)]
pub struct ArrangeHandle {
    thread: JoinHandle<ArrangeOutcome>,
    cancel: CancelToken,
    state: ThreadSafe<ArrangeState>,
}

impl ArrangeHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ArrangeState {
        *self.state.lock()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker and return its outcome
    pub fn join(self) -> LayoutResult<ArrangeOutcome> {
        self.thread.join().map_err(|_| LayoutError::WorkerPanicked)
    }
}
