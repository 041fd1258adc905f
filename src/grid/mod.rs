//! Horizontal ROMS grid.
//!
//! A [`Grid`] holds the longitude/latitude arrays of the rho points of a
//! curvilinear grid together with the optional land mask, bathymetry and
//! vertical s-coordinate description. It is built once and never mutated.
//! Geographic lookups live in [`lookup`].

pub mod lookup;

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, XromsError};
use crate::field::Placement;
use crate::interpolation::bilinear::BilinearInterpolator;
use crate::interpolation::{Interpolator, INDEX_TOLERANCE};
use crate::vertical::VerticalGrid;

/// A fractional position in rho-point index space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCoord {
    /// Fractional row (eta) index
    pub row: f64,
    /// Fractional column (xi) index
    pub col: f64,
}

impl GridCoord {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Shift by a (row, col) offset
    pub fn offset(self, row: f64, col: f64) -> Self {
        Self {
            row: self.row + row,
            col: self.col + col,
        }
    }
}

/// Land masks at all four placements, derived once from the rho mask
#[derive(Debug, Clone)]
struct Masks {
    rho: Array2<bool>,
    u: Array2<bool>,
    v: Array2<bool>,
    psi: Array2<bool>,
}

impl Masks {
    /// Staggered points are sea only when every adjoining rho point is sea
    fn from_rho(mask: Array2<bool>) -> Self {
        let (rows, cols) = mask.dim();
        let u = Array2::from_shape_fn(Placement::U.shape_on((rows, cols)), |(j, i)| {
            mask[[j, i]] && mask[[j, i + 1]]
        });
        let v = Array2::from_shape_fn(Placement::V.shape_on((rows, cols)), |(j, i)| {
            mask[[j, i]] && mask[[j + 1, i]]
        });
        let psi = Array2::from_shape_fn(Placement::Psi.shape_on((rows, cols)), |(j, i)| {
            mask[[j, i]] && mask[[j, i + 1]] && mask[[j + 1, i]] && mask[[j + 1, i + 1]]
        });
        Self { rho: mask, u, v, psi }
    }
}

/// Curvilinear horizontal grid at rho points
#[derive(Debug, Clone)]
pub struct Grid {
    lon: Array2<f64>,
    lat: Array2<f64>,
    masks: Option<Masks>,
    h: Option<Array2<f64>>,
    vertical: Option<VerticalGrid>,
}

impl Grid {
    /// Create a grid from 2-D longitude and latitude arrays
    pub fn new(lon: Array2<f64>, lat: Array2<f64>) -> Result<Self> {
        if lon.dim() != lat.dim() {
            return Err(XromsError::shape_mismatch("lat", lon.shape(), lat.shape()));
        }

        let (rows, cols) = lon.dim();
        if rows < 2 || cols < 2 {
            return Err(XromsError::InvalidParameter {
                param: "grid".to_string(),
                message: format!("Grid must have at least 2x2 points, got {}x{}", rows, cols),
            });
        }

        if lon.iter().chain(lat.iter()).any(|v| !v.is_finite()) {
            return Err(XromsError::InvalidParameter {
                param: "grid".to_string(),
                message: "Grid coordinates must be finite".to_string(),
            });
        }

        Ok(Self {
            lon,
            lat,
            masks: None,
            h: None,
            vertical: None,
        })
    }

    /// Create a rectilinear grid from 1-D longitude and latitude axes
    pub fn rectilinear(lons: &[f64], lats: &[f64]) -> Result<Self> {
        let lon_axis = Array1::from_vec(lons.to_vec());
        let lat_axis = Array1::from_vec(lats.to_vec());
        let shape = (lats.len(), lons.len());

        let lon = Array2::from_shape_fn(shape, |(_, i)| lon_axis[i]);
        let lat = Array2::from_shape_fn(shape, |(j, _)| lat_axis[j]);
        Self::new(lon, lat)
    }

    /// Attach a land/sea mask (true = sea)
    pub fn with_mask(mut self, mask: Array2<bool>) -> Result<Self> {
        if mask.dim() != self.lon.dim() {
            return Err(XromsError::shape_mismatch("mask", self.lon.shape(), mask.shape()));
        }
        self.masks = Some(Masks::from_rho(mask));
        Ok(self)
    }

    /// Attach bathymetry (positive depth in metres)
    pub fn with_bathymetry(mut self, h: Array2<f64>) -> Result<Self> {
        if h.dim() != self.lon.dim() {
            return Err(XromsError::shape_mismatch("h", self.lon.shape(), h.shape()));
        }
        self.h = Some(h);
        Ok(self)
    }

    /// Attach the vertical s-coordinate description
    pub fn with_vertical(mut self, vertical: VerticalGrid) -> Self {
        self.vertical = Some(vertical);
        self
    }

    /// Shape of the rho grid as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.lon.dim()
    }

    pub fn lon(&self) -> ArrayView2<'_, f64> {
        self.lon.view()
    }

    pub fn lat(&self) -> ArrayView2<'_, f64> {
        self.lat.view()
    }

    /// Rho-point land mask (true = sea)
    pub fn mask(&self) -> Option<ArrayView2<'_, bool>> {
        self.mask_for(Placement::Rho)
    }

    pub fn bathymetry(&self) -> Option<ArrayView2<'_, f64>> {
        self.h.as_ref().map(|h| h.view())
    }

    pub fn vertical(&self) -> Option<&VerticalGrid> {
        self.vertical.as_ref()
    }

    /// Whether a fractional index lies within the rho index range
    pub fn contains(&self, coord: GridCoord) -> bool {
        let (rows, cols) = self.shape();
        coord.row >= -INDEX_TOLERANCE
            && coord.col >= -INDEX_TOLERANCE
            && coord.row <= (rows - 1) as f64 + INDEX_TOLERANCE
            && coord.col <= (cols - 1) as f64 + INDEX_TOLERANCE
    }

    /// Land mask at the given placement.
    ///
    /// Staggered points are sea only when every adjoining rho point is sea.
    pub fn mask_for(&self, placement: Placement) -> Option<ArrayView2<'_, bool>> {
        let masks = self.masks.as_ref()?;
        let mask = match placement {
            Placement::Rho => &masks.rho,
            Placement::U => &masks.u,
            Placement::V => &masks.v,
            Placement::Psi => &masks.psi,
        };
        Some(mask.view())
    }

    /// Bathymetry interpolated at a fractional rho index
    pub fn bathymetry_at(&self, coord: GridCoord) -> Result<f64> {
        let h = self.h.as_ref().ok_or_else(|| XromsError::DataNotFound {
            message: "Grid has no bathymetry".to_string(),
        })?;

        BilinearInterpolator
            .interpolate(h.view(), None, coord)?
            .ok_or_else(|| XromsError::DataNotFound {
                message: format!(
                    "No finite bathymetry near row {}, col {}",
                    coord.row, coord.col
                ),
            })
    }
}
