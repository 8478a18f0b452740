//! # Localplot
//!
//! Arranges HPGL drawings on a pen plotter sheet.
//!
//! ## Architecture
//!
//! Localplot is organized as a workspace with multiple crates:
//!
//! 1. **localplot-core** - Geometry, plotter units, event bus, shared errors
//! 2. **localplot-layout** - Item store, shelf packer, auto-arrange job
//! 3. **localplot-settings** - Configuration files
//! 4. **localplot** - Drawing list loading and the command line front end

pub mod drawings;

pub use drawings::{load_into_store, read_drawings, ArrangeSummary, DrawingFile, PlacedDrawing};

pub use localplot_core::{
    event_bus, AppEvent, Error, EventBus, EventBusConfig, EventFilter, FileEvent, LayoutEvent,
    PlotUnits, Point, Rect, Result, StatusLevel,
};

pub use localplot_layout::{
    ArrangeConfig, ArrangeEvent, ArrangeJob, ArrangeOutcome, ArrangeReport, ArrangeSession,
    CancelToken, EntryId, ItemGroup, ItemStore, Polygon, ShelfHeuristic, SortOrder,
};

pub use localplot_settings::{ArrangeSettings, Config, PlotterSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for results
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
