//! Common utilities for interpolation algorithms.
//!
//! This module provides shared functionality used by various interpolation methods.

use ndarray::ArrayView2;

use crate::error::{Result, XromsError};
use crate::grid::GridCoord;

/// Clamp an index to valid bounds
pub fn clamp_index(index: f64, size: usize) -> f64 {
    index.max(0.0).min(size.saturating_sub(1) as f64)
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}

/// Split a fractional index into the lower cell index and the fraction within
/// that cell. The upper edge maps to the last cell with fraction 1, so the
/// lower index always has a neighbour when `size >= 2`.
pub fn cell_and_fraction(index: f64, size: usize) -> (usize, f64) {
    if size < 2 {
        return (0, 0.0);
    }
    let index = clamp_index(index, size);
    let lower = (index.floor() as usize).min(size - 2);
    (lower, index - lower as f64)
}

/// Reject non-finite coordinates and coordinates further than `tolerance`
/// outside the array, then clamp into range
pub fn checked_coord(coord: GridCoord, shape: (usize, usize), tolerance: f64) -> Result<GridCoord> {
    let (rows, cols) = shape;
    let inside = coord.row.is_finite()
        && coord.col.is_finite()
        && coord.row >= -tolerance
        && coord.col >= -tolerance
        && coord.row <= (rows.saturating_sub(1)) as f64 + tolerance
        && coord.col <= (cols.saturating_sub(1)) as f64 + tolerance;

    if !inside {
        return Err(XromsError::IndexOutOfDomain {
            row: coord.row,
            col: coord.col,
            rows,
            cols,
        });
    }

    Ok(GridCoord::new(
        clamp_index(coord.row, rows),
        clamp_index(coord.col, cols),
    ))
}

/// Ensure a mask covers exactly the data array
pub fn check_mask(data: &ArrayView2<f64>, mask: Option<&ArrayView2<bool>>) -> Result<()> {
    match mask {
        Some(m) if m.dim() != data.dim() => Err(XromsError::shape_mismatch(
            "mask",
            data.shape(),
            m.shape(),
        )),
        _ => Ok(()),
    }
}

/// Whether the node at (row, col) carries a usable value
pub fn is_wet(data: &ArrayView2<f64>, mask: Option<&ArrayView2<bool>>, row: usize, col: usize) -> bool {
    let wet = mask.map_or(true, |m| m[[row, col]]);
    wet && data[[row, col]].is_finite()
}
