//! Error types for xroms.
//!
//! A single error enum covers the grid lookup, section extraction and field
//! registry failures, plus the I/O and configuration errors of the loader and
//! the command-line front end.

use thiserror::Error;

/// The main error type for xroms operations.
#[derive(Error, Debug)]
pub enum XromsError {
    /// Query point lies outside the grid domain
    #[error("Point ({lon}, {lat}) is outside the grid domain")]
    OutOfDomain { lon: f64, lat: f64 },

    /// Fractional grid index lies outside the index range of the grid
    #[error("Grid index (row {row}, col {col}) is outside the grid ({rows} x {cols})")]
    IndexOutOfDomain {
        row: f64,
        col: f64,
        rows: usize,
        cols: usize,
    },

    /// Array shape inconsistent with the grid or with the declared placement
    #[error("Shape mismatch for {name}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Variable name not registered
    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    /// Path violates its construction invariants
    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ndarray shape errors when building arrays from flat buffers
    #[error("Array shape error: {0}")]
    Array(#[from] ndarray::ShapeError),

    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),
}

impl XromsError {
    /// Build a shape mismatch error from two shapes
    pub fn shape_mismatch(name: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        XromsError::ShapeMismatch {
            name: name.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// True for the out-of-domain family of errors
    pub fn is_out_of_domain(&self) -> bool {
        matches!(
            self,
            XromsError::OutOfDomain { .. } | XromsError::IndexOutOfDomain { .. }
        )
    }
}

/// Convenience type alias for Results with XromsError
pub type Result<T> = std::result::Result<T, XromsError>;
