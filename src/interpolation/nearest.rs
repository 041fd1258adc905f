//! Nearest neighbor interpolation.
//!
//! This method selects the value of the nearest grid node. A land or
//! missing nearest node yields no value.

use ndarray::ArrayView2;

use super::{Interpolator, INDEX_TOLERANCE};
use crate::error::Result;
use crate::grid::GridCoord;
use crate::interpolation::common;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn interpolate(
        &self,
        data: ArrayView2<f64>,
        mask: Option<ArrayView2<bool>>,
        coord: GridCoord,
    ) -> Result<Option<f64>> {
        common::check_mask(&data, mask.as_ref())?;
        let coord = common::checked_coord(coord, data.dim(), INDEX_TOLERANCE)?;

        let (rows, cols) = data.dim();
        let row = common::clamp_index(coord.row.round(), rows) as usize;
        let col = common::clamp_index(coord.col.round(), cols) as usize;

        if !common::is_wet(&data, mask.as_ref(), row, col) {
            return Ok(None);
        }
        Ok(Some(data[[row, col]]))
    }

    fn name(&self) -> &str {
        "nearest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_interpolation_2d() {
        // 3x3 grid with values increasing from left to right, top to bottom
        let data = array![
            [1.0, 2.0, 3.0], // row 0
            [4.0, 5.0, 6.0], // row 1
            [7.0, 8.0, 9.0], // row 2
        ];
        let interpolator = NearestInterpolator;
        let at = |row, col| {
            interpolator
                .interpolate(data.view(), None, GridCoord::new(row, col))
                .unwrap()
        };

        // Corners
        assert_eq!(at(0.0, 0.0), Some(1.0));
        assert_eq!(at(0.0, 2.0), Some(3.0));
        assert_eq!(at(2.0, 0.0), Some(7.0));
        assert_eq!(at(2.0, 2.0), Some(9.0));

        // Center
        assert_eq!(at(1.0, 1.0), Some(5.0));

        // Fractional indices
        assert_eq!(at(0.7, 1.3), Some(5.0));
        assert_eq!(at(1.2, 1.7), Some(6.0));
    }

    #[test]
    fn test_nearest_masked() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let mask = array![[true, false], [true, true]];
        let interpolator = NearestInterpolator;

        let value = interpolator
            .interpolate(data.view(), Some(mask.view()), GridCoord::new(0.1, 0.9))
            .unwrap();
        assert_eq!(value, None);

        let value = interpolator
            .interpolate(data.view(), Some(mask.view()), GridCoord::new(0.9, 0.9))
            .unwrap();
        assert_eq!(value, Some(4.0));
    }

    #[test]
    fn test_nearest_interpolation_error_cases() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let interpolator = NearestInterpolator;

        let result = interpolator.interpolate(data.view(), None, GridCoord::new(1.0, 3.0));
        assert!(result.is_err());

        let result = interpolator.interpolate(data.view(), None, GridCoord::new(-0.5, 0.0));
        assert!(result.is_err());
    }
}
