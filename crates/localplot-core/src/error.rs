//! Error handling for Localplot
//!
//! Provides the error types shared by every crate in the workspace:
//! - Geometry errors (invalid coordinates or sizes)
//! - I/O errors
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when plot-space values cannot describe a real shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite
    #[error("Non-finite coordinate in {what}")]
    NonFinite {
        /// What was being constructed.
        what: String,
    },

    /// Width or height was negative
    #[error("Negative size {width}x{height}")]
    NegativeSize {
        /// The offending width.
        width: f64,
        /// The offending height.
        height: f64,
    },

    /// A dimension that must be strictly positive was not
    #[error("{what} must be > 0, got {value}")]
    NotPositive {
        /// Name of the dimension.
        what: String,
        /// The value that was rejected.
        value: f64,
    },
}

/// Main error type for Localplot
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
