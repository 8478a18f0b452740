//! Drawing primitives and the group that aggregates them.
//!
//! A loaded drawing is a list of polygons (pen-down polylines) in plotter
//! units. The group positions them on the sheet as one unit and answers
//! bounding-box queries over all current primitives.

use localplot_core::{GeometryError, Point, Rect};
use serde::{Deserialize, Serialize};

/// An open or closed polyline in drawing-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a polygon, rejecting non-finite coordinates
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(GeometryError::NonFinite {
                what: "polygon".to_string(),
            });
        }
        Ok(Self { points })
    }

    /// Build from `(x, y)` pairs
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self, GeometryError> {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Axis-aligned rectangle outline, handy for tests and placeholders
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        if width < 0.0 || height < 0.0 {
            return Err(GeometryError::NegativeSize { width, height });
        }
        Self::from_coords(&[
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
            (x, y),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::bounding(self.points.iter())
    }
}

/// Behavior flags on a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupFlag {
    /// The user may drag the drawing.
    Movable,
    /// The user may select the drawing.
    Selectable,
}

/// The aggregate of one drawing's primitives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    polygons: Vec<Polygon>,
    pos: Point,
    movable: bool,
    selectable: bool,
}

impl ItemGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_polygons(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            ..Self::default()
        }
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bounding box of all primitives in group-local coordinates.
    ///
    /// A group with no points reports a zero rectangle at the origin. Fails
    /// when the points are finite but too far apart for the size to be.
    pub fn bounding_rect(&self) -> Result<Rect, GeometryError> {
        let mut points = self.polygons.iter().flat_map(|p| p.points().iter()).peekable();
        if points.peek().is_none() {
            return Ok(Rect::default());
        }
        Rect::bounding(points).ok_or_else(|| GeometryError::NonFinite {
            what: "drawing bounding box".to_string(),
        })
    }

    /// Bounding box on the sheet (local box moved by the group position)
    pub fn scene_rect(&self) -> Result<Rect, GeometryError> {
        Ok(self.bounding_rect()?.translated(self.pos))
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }

    /// Move the group so its scene bounding box starts at `origin`
    pub fn move_bounds_to(&mut self, origin: Point) -> Result<(), GeometryError> {
        self.pos = origin - self.bounding_rect()?.min();
        Ok(())
    }

    pub fn set_flag(&mut self, flag: GroupFlag, value: bool) {
        match flag {
            GroupFlag::Movable => self.movable = value,
            GroupFlag::Selectable => self.selectable = value,
        }
    }

    pub fn has_flag(&self, flag: GroupFlag) -> bool {
        match flag {
            GroupFlag::Movable => self.movable,
            GroupFlag::Selectable => self.selectable,
        }
    }
}
