//! Unit conversion utilities
//!
//! HPGL plotters address the sheet in graphic units of 1/1016 inch
//! (0.025 mm). Settings are entered in millimeters and converted here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plotter graphic units per inch
pub const UNITS_PER_INCH: f64 = 1016.0;

/// Plotter graphic units per millimeter
pub const UNITS_PER_MM: f64 = UNITS_PER_INCH / 25.4;

/// Convert millimeters to plotter graphic units
pub fn mm_to_plotter_units(mm: f64) -> f64 {
    mm * UNITS_PER_MM
}

/// Convert plotter graphic units to millimeters
pub fn plotter_units_to_mm(units: f64) -> f64 {
    units / UNITS_PER_MM
}

/// Unit used when showing plot dimensions to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotUnits {
    /// Raw graphic units
    Plotter,
    /// Millimeters
    #[default]
    Millimeters,
    /// Inches
    Inches,
}

impl PlotUnits {
    /// Convert a value in plotter units into this unit
    pub fn from_plotter(self, units: f64) -> f64 {
        match self {
            Self::Plotter => units,
            Self::Millimeters => plotter_units_to_mm(units),
            Self::Inches => units / UNITS_PER_INCH,
        }
    }

    /// Format a value in plotter units for display
    pub fn format(self, units: f64) -> String {
        match self {
            Self::Plotter => format!("{:.0} {}", units, self),
            _ => format!("{:.2} {}", self.from_plotter(units), self),
        }
    }
}

impl fmt::Display for PlotUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plotter => write!(f, "gu"),
            Self::Millimeters => write!(f, "mm"),
            Self::Inches => write!(f, "in"),
        }
    }
}

impl FromStr for PlotUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gu" | "plotter" => Ok(Self::Plotter),
            "mm" | "millimeters" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            _ => Err(format!("Unknown plot unit: {}", s)),
        }
    }
}
