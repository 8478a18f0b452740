//! Rectangle packing.
//!
//! The arrange job talks to a packer through [`RectPacker`] so the algorithm
//! can be swapped (or scripted in tests). [`ShelfPacker`] is the default.

mod shelf;

pub use shelf::ShelfPacker;

use localplot_core::Rect;
use serde::{Deserialize, Serialize};

/// How a shelf packer picks the shelf for the next rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfHeuristic {
    /// Only ever try the newest shelf.
    NextFit,
    /// First shelf, top to bottom, that has room.
    FirstFit,
    /// Shelf with the smallest free area.
    BestAreaFit,
    /// Shelf with the largest free area.
    WorstAreaFit,
    /// Shelf whose height wastes the least above the rectangle.
    #[default]
    BestHeightFit,
    /// Shelf with the least horizontal room left after placing.
    BestWidthFit,
    /// Shelf with the most horizontal room left after placing.
    WorstWidthFit,
}

/// A greedy, order-dependent rectangle packer.
///
/// One packer instance serves one arrange run: `init` once, then one
/// `insert` per rectangle. Space is never freed.
pub trait RectPacker {
    /// Reset to an empty bin of the given size
    fn init(&mut self, width: f64, height: f64, allow_rotation: bool);

    /// Place a `width` x `height` rectangle.
    ///
    /// Returns the occupied rectangle inside the bin (possibly rotated), or
    /// `None` when it does not fit anywhere.
    fn insert(&mut self, width: f64, height: f64, heuristic: ShelfHeuristic) -> Option<Rect>;
}
