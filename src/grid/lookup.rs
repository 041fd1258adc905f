//! Geographic lookups on a [`Grid`].
//!
//! Longitude/latitude is mapped to fractional grid indices by locating the
//! cell that contains the point and inverting the bilinear map of that cell
//! with a few Newton iterations. Cells around the nearest node are tried
//! first; a full scan is the fallback for strongly curved grids.

use tracing::trace;

use super::{Grid, GridCoord};
use crate::error::{Result, XromsError};
use crate::interpolation::bilinear::BilinearInterpolator;
use crate::interpolation::Interpolator;
use crate::lonlat::{self, LonLat};

/// Accepted overshoot of the local cell coordinates outside [0, 1]
const CELL_TOLERANCE: f64 = 1e-9;
const MAX_NEWTON_ITERATIONS: usize = 30;

impl Grid {
    /// Index of the grid node nearest to `p`
    pub fn nearest(&self, p: LonLat) -> (usize, usize) {
        let mut best = (0, 0);
        let mut best_dist = f64::MAX;

        for (((j, i), &lon), &lat) in self.lon.indexed_iter().zip(self.lat.iter()) {
            let (dx, dy) = lonlat::local_offset(p, LonLat::new(lon, lat));
            let dist = dx * dx + dy * dy;
            if dist < best_dist {
                best_dist = dist;
                best = (j, i);
            }
        }

        best
    }

    /// Fractional (row, col) index of a geographic position.
    ///
    /// Fails with [`XromsError::OutOfDomain`] when no grid cell contains the
    /// point.
    pub fn lonlat_to_index(&self, p: LonLat) -> Result<GridCoord> {
        if !p.is_finite() {
            return Err(XromsError::OutOfDomain {
                lon: p.lon,
                lat: p.lat,
            });
        }

        let (j, i) = self.nearest(p);
        if self.lon[[j, i]] == p.lon && self.lat[[j, i]] == p.lat {
            return Ok(GridCoord::new(j as f64, i as f64));
        }

        let (rows, cols) = self.shape();
        let row_cells = j.saturating_sub(1)..=j.min(rows - 2);
        for j0 in row_cells {
            for i0 in i.saturating_sub(1)..=i.min(cols - 2) {
                if let Some(coord) = self.invert_cell(j0, i0, p) {
                    return Ok(coord);
                }
            }
        }

        trace!(lon = p.lon, lat = p.lat, "Falling back to full cell scan");
        for j0 in 0..rows - 1 {
            for i0 in 0..cols - 1 {
                if !self.cell_may_contain(j0, i0, p) {
                    continue;
                }
                if let Some(coord) = self.invert_cell(j0, i0, p) {
                    return Ok(coord);
                }
            }
        }

        Err(XromsError::OutOfDomain {
            lon: p.lon,
            lat: p.lat,
        })
    }

    /// Geographic position of a fractional (row, col) index
    pub fn index_to_lonlat(&self, coord: GridCoord) -> Result<LonLat> {
        if !self.contains(coord) {
            let (rows, cols) = self.shape();
            return Err(XromsError::IndexOutOfDomain {
                row: coord.row,
                col: coord.col,
                rows,
                cols,
            });
        }

        let lon = BilinearInterpolator.interpolate(self.lon.view(), None, coord)?;
        let lat = BilinearInterpolator.interpolate(self.lat.view(), None, coord)?;
        match (lon, lat) {
            (Some(lon), Some(lat)) => Ok(LonLat::new(lon, lat)),
            _ => Err(XromsError::DataNotFound {
                message: format!("No coordinates at row {}, col {}", coord.row, coord.col),
            }),
        }
    }

    fn corners(&self, j0: usize, i0: usize) -> [(f64, f64); 4] {
        let at = |j: usize, i: usize| (self.lon[[j, i]], self.lat[[j, i]]);
        [
            at(j0, i0),
            at(j0, i0 + 1),
            at(j0 + 1, i0 + 1),
            at(j0 + 1, i0),
        ]
    }

    fn cell_may_contain(&self, j0: usize, i0: usize, p: LonLat) -> bool {
        let corners = self.corners(j0, i0);
        let (mut lon_min, mut lon_max) = (f64::MAX, f64::MIN);
        let (mut lat_min, mut lat_max) = (f64::MAX, f64::MIN);
        for (lon, lat) in corners {
            lon_min = lon_min.min(lon);
            lon_max = lon_max.max(lon);
            lat_min = lat_min.min(lat);
            lat_max = lat_max.max(lat);
        }
        let pad = 1e-9 * (lon_max - lon_min).abs().max((lat_max - lat_min).abs()).max(1.0);
        p.lon >= lon_min - pad && p.lon <= lon_max + pad && p.lat >= lat_min - pad && p.lat <= lat_max + pad
    }

    /// Solve the bilinear map of cell (j0, i0) for `p`.
    ///
    /// Returns the fractional index when the local coordinates fall inside
    /// the cell.
    fn invert_cell(&self, j0: usize, i0: usize, p: LonLat) -> Option<GridCoord> {
        let [a, b, c, d] = self.corners(j0, i0);

        // s runs along the column axis, t along the row axis
        let (mut s, mut t) = (0.5, 0.5);
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let fx = (1.0 - s) * (1.0 - t) * a.0 + s * (1.0 - t) * b.0 + s * t * c.0 + (1.0 - s) * t * d.0 - p.lon;
            let fy = (1.0 - s) * (1.0 - t) * a.1 + s * (1.0 - t) * b.1 + s * t * c.1 + (1.0 - s) * t * d.1 - p.lat;

            let dxds = (1.0 - t) * (b.0 - a.0) + t * (c.0 - d.0);
            let dyds = (1.0 - t) * (b.1 - a.1) + t * (c.1 - d.1);
            let dxdt = (1.0 - s) * (d.0 - a.0) + s * (c.0 - b.0);
            let dydt = (1.0 - s) * (d.1 - a.1) + s * (c.1 - b.1);

            let det = dxds * dydt - dyds * dxdt;
            if det.abs() < f64::EPSILON * f64::EPSILON {
                return None;
            }

            let ds = (fx * dydt - fy * dxdt) / det;
            let dt = (dxds * fy - dyds * fx) / det;
            s -= ds;
            t -= dt;

            if !s.is_finite() || !t.is_finite() {
                return None;
            }
            if ds.abs() + dt.abs() < 1e-14 {
                break;
            }
        }

        let inside = |x: f64| (-CELL_TOLERANCE..=1.0 + CELL_TOLERANCE).contains(&x);
        if !inside(s) || !inside(t) {
            return None;
        }

        Some(GridCoord::new(
            j0 as f64 + t.clamp(0.0, 1.0),
            i0 as f64 + s.clamp(0.0, 1.0),
        ))
    }
}
