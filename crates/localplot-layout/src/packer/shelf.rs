//! Shelf bin packing.
//!
//! Rectangles are laid left to right along horizontal shelves. A shelf's
//! height is set by what it holds; only the newest shelf may still grow.
//! When no shelf has room a new one opens directly under the last.

use super::{RectPacker, ShelfHeuristic};
use localplot_core::Rect;

/// Slack for accumulated floating point error when comparing against the bin.
const FIT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shelf {
    y: f64,
    height: f64,
    cursor_x: f64,
}

/// Greedy shelf packer
#[derive(Debug, Clone, Default)]
pub struct ShelfPacker {
    bin_width: f64,
    bin_height: f64,
    allow_rotation: bool,
    shelves: Vec<Shelf>,
    placed: Vec<Rect>,
    used_area: f64,
}

impl ShelfPacker {
    pub fn new(width: f64, height: f64, allow_rotation: bool) -> Self {
        let mut packer = Self::default();
        packer.init(width, height, allow_rotation);
        packer
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn bin_height(&self) -> f64 {
        self.bin_height
    }

    /// Every rectangle placed since `init`, in insertion order
    pub fn placed(&self) -> &[Rect] {
        &self.placed
    }

    pub fn used_area(&self) -> f64 {
        self.used_area
    }

    /// Fraction of the bin area in use
    pub fn occupancy(&self) -> f64 {
        let area = self.bin_width * self.bin_height;
        if area > 0.0 {
            self.used_area / area
        } else {
            0.0
        }
    }

    fn slack(extent: f64) -> f64 {
        FIT_TOLERANCE * extent.abs().max(1.0)
    }

    fn is_last(&self, index: usize) -> bool {
        index + 1 == self.shelves.len()
    }

    /// Orientations worth trying, upright first
    fn orientations(&self, width: f64, height: f64) -> impl Iterator<Item = (f64, f64)> {
        let rotated = (self.allow_rotation && width != height).then_some((height, width));
        std::iter::once((width, height)).chain(rotated)
    }

    fn fits(&self, shelf: &Shelf, width: f64, height: f64, can_grow: bool) -> bool {
        let max_height = if can_grow {
            self.bin_height - shelf.y
        } else {
            shelf.height
        };
        shelf.cursor_x + width <= self.bin_width + Self::slack(self.bin_width)
            && height <= max_height + Self::slack(self.bin_height)
    }

    /// Orientation to use on a shelf, if any fits.
    ///
    /// Prefers the tallest orientation that needs no growth, then the one
    /// that grows the shelf least.
    fn orient(&self, index: usize, width: f64, height: f64) -> Option<(f64, f64)> {
        let shelf = &self.shelves[index];
        let can_grow = self.is_last(index);
        let fitting: Vec<(f64, f64)> = self
            .orientations(width, height)
            .filter(|&(w, h)| self.fits(shelf, w, h, can_grow))
            .collect();

        let without_growth = fitting
            .iter()
            .copied()
            .filter(|&(_, h)| h <= shelf.height)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        without_growth.or_else(|| fitting.into_iter().min_by(|a, b| a.1.total_cmp(&b.1)))
    }

    /// Lower score is better
    fn score(&self, shelf: &Shelf, width: f64, height: f64, heuristic: ShelfHeuristic) -> f64 {
        let free_width = self.bin_width - shelf.cursor_x;
        match heuristic {
            ShelfHeuristic::NextFit | ShelfHeuristic::FirstFit => 0.0,
            ShelfHeuristic::BestAreaFit => free_width * shelf.height,
            ShelfHeuristic::WorstAreaFit => -(free_width * shelf.height),
            ShelfHeuristic::BestHeightFit => (shelf.height - height).max(0.0),
            ShelfHeuristic::BestWidthFit => free_width - width,
            ShelfHeuristic::WorstWidthFit => -(free_width - width),
        }
    }

    fn choose_shelf(
        &self,
        width: f64,
        height: f64,
        heuristic: ShelfHeuristic,
    ) -> Option<(usize, f64, f64)> {
        if heuristic == ShelfHeuristic::NextFit {
            let last = self.shelves.len().checked_sub(1)?;
            return self.orient(last, width, height).map(|(w, h)| (last, w, h));
        }

        let mut best: Option<(usize, f64, f64, f64)> = None;
        for index in 0..self.shelves.len() {
            let Some((w, h)) = self.orient(index, width, height) else {
                continue;
            };
            if heuristic == ShelfHeuristic::FirstFit {
                return Some((index, w, h));
            }
            let score = self.score(&self.shelves[index], w, h, heuristic);
            if best.is_none_or(|(_, _, _, s)| score < s) {
                best = Some((index, w, h, score));
            }
        }
        best.map(|(index, w, h, _)| (index, w, h))
    }

    fn place(&mut self, index: usize, width: f64, height: f64) -> Rect {
        let shelf = &mut self.shelves[index];
        let rect = Rect::new(shelf.cursor_x, shelf.y, width, height);
        shelf.cursor_x += width;
        shelf.height = shelf.height.max(height);
        self.used_area += rect.area();
        self.placed.push(rect);
        rect
    }

    fn open_shelf(&mut self, width: f64, height: f64) -> Option<Rect> {
        // Lay the rectangle flat so the new shelf is as low as possible.
        let (width, height) = self
            .orientations(width, height)
            .filter(|&(w, _)| w <= self.bin_width + Self::slack(self.bin_width))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let y = self
            .shelves
            .last()
            .map(|s| s.y + s.height)
            .unwrap_or(0.0);
        if y + height > self.bin_height + Self::slack(self.bin_height) {
            return None;
        }

        self.shelves.push(Shelf {
            y,
            height,
            cursor_x: 0.0,
        });
        Some(self.place(self.shelves.len() - 1, width, height))
    }
}

impl RectPacker for ShelfPacker {
    fn init(&mut self, width: f64, height: f64, allow_rotation: bool) {
        self.bin_width = width;
        self.bin_height = height;
        self.allow_rotation = allow_rotation;
        self.shelves.clear();
        self.placed.clear();
        self.used_area = 0.0;
    }

    fn insert(&mut self, width: f64, height: f64, heuristic: ShelfHeuristic) -> Option<Rect> {
        if !(width >= 0.0 && height >= 0.0 && width.is_finite() && height.is_finite()) {
            return None;
        }
        match self.choose_shelf(width, height, heuristic) {
            Some((index, w, h)) => Some(self.place(index, w, h)),
            None => self.open_shelf(width, height),
        }
    }
}
