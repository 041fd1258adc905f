//! Arakawa C-grid placements.
//!
//! ROMS stores scalars at cell centres (rho points), the xi-velocity on the
//! cell faces between columns (u points), the eta-velocity between rows
//! (v points) and vorticity-like quantities at cell corners (psi points).
//! Each placement knows its shape and its half-cell offset relative to the
//! rho grid, and how a field placed there is sampled.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, XromsError};
use crate::grid::{Grid, GridCoord};
use crate::interpolation::Interpolator;

/// Position of a variable within a C-grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Rho,
    U,
    V,
    Psi,
}

impl Placement {
    /// Offset (rows, cols) of the first point of this placement in rho index space
    pub fn offset(self) -> (f64, f64) {
        match self {
            Placement::Rho => (0.0, 0.0),
            Placement::U => (0.0, 0.5),
            Placement::V => (0.5, 0.0),
            Placement::Psi => (0.5, 0.5),
        }
    }

    /// Horizontal shape of this placement on a rho grid of shape `(rows, cols)`
    pub fn shape_on(self, (rows, cols): (usize, usize)) -> (usize, usize) {
        match self {
            Placement::Rho => (rows, cols),
            Placement::U => (rows, cols - 1),
            Placement::V => (rows - 1, cols),
            Placement::Psi => (rows - 1, cols - 1),
        }
    }

    /// Convert a rho-space coordinate to this placement's index space.
    ///
    /// Near the grid edges the shifted coordinate can fall up to half a cell
    /// outside the staggered array; it is clamped to the edge value there.
    pub fn to_placement_coord(self, coord: GridCoord, grid_shape: (usize, usize)) -> GridCoord {
        let (dr, dc) = self.offset();
        let (rows, cols) = self.shape_on(grid_shape);
        let shifted = coord.offset(-dr, -dc);
        GridCoord::new(
            shifted.row.clamp(0.0, (rows - 1) as f64),
            shifted.col.clamp(0.0, (cols - 1) as f64),
        )
    }

    /// Sample a 2-D array of this placement at a rho-space coordinate.
    ///
    /// Returns `Ok(None)` when every contributing point is land.
    pub fn sample(
        self,
        grid: &Grid,
        data: ArrayView2<f64>,
        coord: GridCoord,
        interpolator: &dyn Interpolator,
    ) -> Result<Option<f64>> {
        let expected = self.shape_on(grid.shape());
        if data.dim() != expected {
            return Err(XromsError::shape_mismatch(
                self.to_string(),
                &[expected.0, expected.1],
                data.shape(),
            ));
        }

        let local = self.to_placement_coord(coord, grid.shape());
        interpolator.interpolate(data, grid.mask_for(self), local)
    }

    /// Infer the placement from ROMS horizontal dimension names
    pub fn from_dimensions<S: AsRef<str>>(dims: &[S]) -> Option<Self> {
        if dims.len() < 2 {
            return None;
        }
        let eta = dims[dims.len() - 2].as_ref();
        let xi = dims[dims.len() - 1].as_ref();
        match (eta, xi) {
            ("eta_rho", "xi_rho") => Some(Placement::Rho),
            ("eta_u", "xi_u") => Some(Placement::U),
            ("eta_v", "xi_v") => Some(Placement::V),
            ("eta_psi", "xi_psi") => Some(Placement::Psi),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Placement::Rho => "rho",
            Placement::U => "u",
            Placement::V => "v",
            Placement::Psi => "psi",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Placement {
    type Err = XromsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rho" => Ok(Placement::Rho),
            "u" => Ok(Placement::U),
            "v" => Ok(Placement::V),
            "psi" => Ok(Placement::Psi),
            _ => Err(XromsError::InvalidParameter {
                param: "placement".to_string(),
                message: format!("Unknown placement: {}", s),
            }),
        }
    }
}
