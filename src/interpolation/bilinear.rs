//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four surrounding grid nodes. Land and missing nodes get zero weight
//! and the remaining weights are renormalised.

use ndarray::ArrayView2;

use super::{Interpolator, INDEX_TOLERANCE};
use crate::error::Result;
use crate::grid::GridCoord;
use crate::interpolation::common;

/// Bilinear interpolator
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn interpolate(
        &self,
        data: ArrayView2<f64>,
        mask: Option<ArrayView2<bool>>,
        coord: GridCoord,
    ) -> Result<Option<f64>> {
        common::check_mask(&data, mask.as_ref())?;
        let coord = common::checked_coord(coord, data.dim(), INDEX_TOLERANCE)?;
        let (rows, cols) = data.dim();

        let (row0, fr) = common::cell_and_fraction(coord.row, rows);
        let (col0, fc) = common::cell_and_fraction(coord.col, cols);
        let (wr0, wr1) = common::linear_weight(fr);
        let (wc0, wc1) = common::linear_weight(fc);

        let row1 = (row0 + 1).min(rows - 1);
        let col1 = (col0 + 1).min(cols - 1);

        let corners = [
            (row0, col0, wr0 * wc0),
            (row0, col1, wr0 * wc1),
            (row1, col0, wr1 * wc0),
            (row1, col1, wr1 * wc1),
        ];

        let mut weighted = 0.0;
        let mut total = 0.0;
        for &(row, col, weight) in &corners {
            // Zero-weight corners must not contribute, even when NaN
            if weight <= 0.0 || !common::is_wet(&data, mask.as_ref(), row, col) {
                continue;
            }
            weighted += weight * data[[row, col]];
            total += weight;
        }

        if total <= 0.0 {
            return Ok(None);
        }
        Ok(Some(weighted / total))
    }

    fn name(&self) -> &str {
        "bilinear"
    }
}
