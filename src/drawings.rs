//! Drawing lists handed to the command line tool.
//!
//! A drawing list is a JSON array of already measured drawings:
//!
//! ```json
//! [{ "path": "star.hpgl", "polygons": [[[0, 0], [400, 0], [200, 300]]] }]
//! ```
//!
//! Coordinates are plotter units.

use anyhow::Context;
use localplot_core::{AppEvent, EventBus, FileEvent, PlotUnits, Rect};
use localplot_layout::{ArrangeOutcome, ArrangeReport, EntryId, GroupFlag, ItemStore, Polygon};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One drawing as listed in the input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingFile {
    pub path: PathBuf,
    /// Pen-down polylines. Empty means the drawing has not been parsed yet.
    #[serde(default)]
    pub polygons: Vec<Vec<(f64, f64)>>,
}

/// Read a drawing list
pub fn read_drawings(path: &Path) -> anyhow::Result<Vec<DrawingFile>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read drawing list {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid drawing list {}", path.display()))
}

/// Add every drawing to the store, announcing each on the bus
pub fn load_into_store(
    store: &ItemStore,
    drawings: &[DrawingFile],
    bus: &EventBus,
) -> anyhow::Result<Vec<EntryId>> {
    let mut ids = Vec::with_capacity(drawings.len());
    for drawing in drawings {
        let id = store.insert(&drawing.path);
        for coords in &drawing.polygons {
            let polygon = Polygon::from_coords(coords)
                .with_context(|| format!("Bad polygon in {}", drawing.path.display()))?;
            store.add_polygon(id, polygon)?;
        }
        if !drawing.polygons.is_empty() {
            store.set_group_flag(id, GroupFlag::Movable, true)?;
            store.set_group_flag(id, GroupFlag::Selectable, true)?;
        }
        bus.publish(AppEvent::File(FileEvent::Loaded {
            entry: id.value(),
            path: drawing.path.clone(),
        }));
        ids.push(id);
    }
    Ok(ids)
}

/// Where one drawing ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedDrawing {
    pub entry: EntryId,
    pub name: String,
    /// Placement in plotter units
    pub rect: Rect,
    /// Placement origin in display units
    pub origin: String,
}

/// Printable result of an arrange run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrangeSummary {
    pub outcome: ArrangeOutcome,
    pub placements: Vec<PlacedDrawing>,
    pub messages: Vec<String>,
}

impl ArrangeSummary {
    pub fn new(store: &ItemStore, report: &ArrangeReport, units: PlotUnits) -> Self {
        let placements = report
            .placements
            .iter()
            .map(|(entry, rect)| PlacedDrawing {
                entry: *entry,
                name: store
                    .entry_info(*entry)
                    .map(|info| info.name)
                    .unwrap_or_default(),
                rect: *rect,
                origin: format!("{}, {}", units.format(rect.x), units.format(rect.y)),
            })
            .collect();
        Self {
            outcome: report.outcome.clone(),
            placements,
            messages: report.messages.clone(),
        }
    }
}
