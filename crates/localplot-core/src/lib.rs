//! # Localplot Core
//!
//! Core types and utilities shared by the Localplot crates.
//! Provides plot-space geometry, unit conversion, the application event bus,
//! and the common error types.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod types;
pub mod units;

pub use error::{Error, GeometryError, Result};

pub use event_bus::{
    event_bus, AppEvent, EventBus, EventBusConfig, EventCategory, EventFilter, FileEvent,
    LayoutEvent, StatusLevel, SubscriptionId,
};

pub use geometry::{Point, Rect};

pub use types::{
    thread_safe, thread_safe_none, thread_safe_rw_map, thread_safe_some, ProgressCallback,
    ThreadSafe, ThreadSafeOption, ThreadSafeRwMap,
};

pub use units::{mm_to_plotter_units, plotter_units_to_mm, PlotUnits};
