//! # Localplot Layout
//!
//! Sheet layout for loaded plot drawings: the item store that owns each
//! drawing's primitives, a shelf rectangle packer, and the cancellable
//! auto-arrange job that packs every drawing onto the sheet.
//!
//! ## Architecture
//!
//! ```text
//! caller (UI / session)
//!   ├── starts ArrangeJob on a worker thread, keeps a CancelToken
//!   └── drains ArrangeEvents, applies placements to the store
//!
//! ArrangeJob
//!   ├── ItemStore (one try-lock per entry, one entry at a time)
//!   └── RectPacker (ShelfPacker by default)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use localplot_layout::{ArrangeConfig, ArrangeJob, ItemStore};
//!
//! let store = std::sync::Arc::new(ItemStore::new());
//! let (job, mut events) = ArrangeJob::new(store.clone(), ArrangeConfig::new(8000.0))?;
//! let handle = job.spawn()?;
//! while let Some(event) = events.recv_blocking() {
//!     // apply placements, show status lines
//! }
//! let outcome = handle.join()?;
//! ```

pub mod arrange;
pub mod error;
pub mod group;
pub mod packer;
pub mod store;

pub use arrange::{
    accumulated_extent, ArrangeConfig, ArrangeEvent, ArrangeEvents, ArrangeHandle, ArrangeJob,
    ArrangeOutcome, ArrangeReport, ArrangeSession, ArrangeState, CancelToken, ReferenceLine,
};
pub use error::{LayoutError, LayoutResult};
pub use group::{GroupFlag, ItemGroup, Polygon};
pub use packer::{RectPacker, ShelfHeuristic, ShelfPacker};
pub use store::{EntryGuard, EntryId, EntryInfo, ItemStore, SortOrder};
