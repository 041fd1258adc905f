//! Interpolation algorithms for gridded fields.
//!
//! This module provides methods for sampling a 2-D field array at fractional
//! grid indices, honouring an optional land mask.

pub mod bilinear;
pub mod common;
pub mod nearest;

use ndarray::ArrayView2;

use crate::error::Result;
use crate::grid::GridCoord;

/// Tolerance (in index units) for coordinates just outside an array
pub const INDEX_TOLERANCE: f64 = 1e-9;

/// Trait for interpolation methods
pub trait Interpolator: Send + Sync {
    /// Interpolate a value at the given fractional (row, col) index.
    ///
    /// Returns `Ok(None)` when every node that would contribute is land or
    /// missing.
    fn interpolate(
        &self,
        data: ArrayView2<f64>,
        mask: Option<ArrayView2<bool>>,
        coord: GridCoord,
    ) -> Result<Option<f64>>;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Names accepted by [`get_interpolator`]
pub const INTERPOLATION_METHODS: &[&str] = &["nearest", "bilinear"];

/// Get an interpolator by name
pub fn get_interpolator(name: &str) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator)),
        "bilinear" => Ok(Box::new(bilinear::BilinearInterpolator)),
        _ => Err(crate::error::XromsError::InvalidParameter {
            param: "interpolation".to_string(),
            message: format!("Unknown interpolation method: {}", name),
        }),
    }
}
