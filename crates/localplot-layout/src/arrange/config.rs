//! Per-run arrange parameters.
//!
//! Handed to the job when it starts; the job reads nothing from global state.

use crate::packer::ShelfHeuristic;
use crate::store::SortOrder;
use localplot_core::{GeometryError, Point};
use serde::{Deserialize, Serialize};

/// The sheet edge that fixes the bin's width.
///
/// Only the line's extent along the display y axis counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub start: Point,
    pub end: Point,
}

impl ReferenceLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Length of the line projected onto the display y axis
    pub fn projected_length(&self) -> f64 {
        (self.end.y - self.start.y).abs()
    }
}

/// Parameters for one arrange run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangeConfig {
    /// Fixed bin dimension in plotter units (packer x axis, display y axis).
    pub bin_width: f64,
    /// Let the packer turn rectangles by 90 degrees.
    pub allow_rotation: bool,
    /// Shelf choice for every insert.
    pub heuristic: ShelfHeuristic,
    /// Order imposed on the store before sizing.
    pub sort_order: SortOrder,
    /// Gap kept between neighbouring drawings, in plotter units.
    pub spacing: f64,
}

impl ArrangeConfig {
    pub fn new(bin_width: f64) -> Self {
        Self {
            bin_width,
            allow_rotation: true,
            heuristic: ShelfHeuristic::BestHeightFit,
            sort_order: SortOrder::LoadOrder,
            spacing: 0.0,
        }
    }

    pub fn from_reference_line(line: &ReferenceLine) -> Self {
        Self::new(line.projected_length())
    }

    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    pub fn with_heuristic(mut self, heuristic: ShelfHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.bin_width.is_finite() || !self.spacing.is_finite() {
            return Err(GeometryError::NonFinite {
                what: "arrange config".to_string(),
            });
        }
        if self.bin_width <= 0.0 {
            return Err(GeometryError::NotPositive {
                what: "bin width".to_string(),
                value: self.bin_width,
            });
        }
        if self.spacing < 0.0 {
            return Err(GeometryError::NegativeSize {
                width: self.spacing,
                height: self.spacing,
            });
        }
        Ok(())
    }
}
