//! Localplot Settings Crate
//!
//! Loads, validates, and saves the user configuration, and turns the
//! arrange section into the parameters an arrange run is started with.

pub mod config;
pub mod error;

pub use config::{ArrangeSettings, Config, PlotterSettings};
pub use error::{SettingsError, SettingsResult};
