//! Error types for the layout crate.
//!
//! Store access and worker management report these. A run that stops early
//! is not an error: it ends with an [`ArrangeOutcome`](crate::ArrangeOutcome).

use crate::store::EntryId;
use localplot_core::GeometryError;
use thiserror::Error;

/// Errors raised by the item store and the arrange worker
#[derive(Error, Debug)]
pub enum LayoutError {
    /// No entry with this identity is in the store.
    #[error("Unknown entry {0}")]
    UnknownEntry(EntryId),

    /// Another operation holds the entry's lock.
    #[error("Entry {0} is locked by another operation")]
    EntryLocked(EntryId),

    /// The entry has no drawing group yet.
    #[error("Entry {0} has no drawing group")]
    EmptyGroup(EntryId),

    /// Invalid geometry or configuration value.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The worker thread could not be started.
    #[error("Failed to start arrange worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    /// The worker thread panicked before reporting an outcome.
    #[error("Arrange worker panicked")]
    WorkerPanicked,
}

/// Result type alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
