//! Configuration file handling for Localplot
//!
//! Supports JSON and TOML files. Lengths are stored in millimeters and
//! converted to plotter units when an arrange run is configured.
//!
//! Configuration is organized into sections:
//! - Arrange settings (sheet reference line, packing heuristic, spacing)
//! - Plotter preferences (display units, console scroll-back, last folder)

use crate::error::{SettingsError, SettingsResult};
use localplot_core::{mm_to_plotter_units, Point, PlotUnits};
use localplot_layout::{ArrangeConfig, ReferenceLine, ShelfHeuristic, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Auto-arrange preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeSettings {
    /// Allow drawings to be turned by 90 degrees
    pub allow_rotation: bool,
    /// Shelf selection heuristic
    pub heuristic: ShelfHeuristic,
    /// Order drawings are packed in
    pub sort_order: SortOrder,
    /// Gap between neighbouring drawings in mm
    pub spacing_mm: f64,
    /// Sheet edge in mm; its extent along y is the sheet width
    pub width_line: ReferenceLine,
}

impl Default for ArrangeSettings {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            heuristic: ShelfHeuristic::default(),
            sort_order: SortOrder::default(),
            spacing_mm: 0.0,
            width_line: ReferenceLine::new(Point::new(0.0, 0.0), Point::new(0.0, 297.0)),
        }
    }
}

impl ArrangeSettings {
    /// Parameters for one arrange run, in plotter units
    pub fn to_arrange_config(&self) -> ArrangeConfig {
        ArrangeConfig::new(mm_to_plotter_units(self.width_line.projected_length()))
            .with_rotation(self.allow_rotation)
            .with_heuristic(self.heuristic)
            .with_sort_order(self.sort_order)
            .with_spacing(mm_to_plotter_units(self.spacing_mm))
    }
}

/// Plotter and console preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterSettings {
    /// Unit used when showing sizes
    pub display_units: PlotUnits,
    /// Console lines kept for scroll-back
    pub console_history: usize,
    /// Folder drawings were last opened from
    pub last_directory: Option<PathBuf>,
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self {
            display_units: PlotUnits::default(),
            console_history: 500,
            last_directory: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub arrange: ArrangeSettings,
    pub plotter: PlotterSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location, e.g. `~/.config/localplot/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("localplot").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist yet
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent folders
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let line = &self.arrange.width_line;
        if !(line.start.is_finite() && line.end.is_finite()) {
            return Err(SettingsError::invalid(
                "arrange.width_line",
                "coordinates must be finite",
            ));
        }
        if line.projected_length() <= 0.0 {
            return Err(SettingsError::invalid(
                "arrange.width_line",
                "line must have a vertical extent",
            ));
        }
        if !(self.arrange.spacing_mm >= 0.0 && self.arrange.spacing_mm.is_finite()) {
            return Err(SettingsError::invalid(
                "arrange.spacing_mm",
                "must be a finite value >= 0",
            ));
        }
        Ok(())
    }

    /// Remember the folder a drawing was opened from
    pub fn remember_directory(&mut self, file: &Path) {
        if let Some(dir) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.plotter.last_directory = Some(dir.to_path_buf());
        }
    }
}
