//! Test data generation utilities.
//!
//! This module provides synthetic grids and fields with known patterns, and a
//! writer for small ROMS-like NetCDF files.

use ndarray::{Array2, Array3};
use xroms::{Grid, Placement, StaggeredField, VerticalGrid, Vstretching, Vtransform};

/// Rows and columns of the curvilinear test grid
pub const CURVILINEAR_SHAPE: (usize, usize) = (8, 10);

/// The 3x3 grid with longitudes [0, 1, 2] and latitudes [0, 1, 2]
pub fn unit_grid() -> Grid {
    Grid::rectilinear(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap()
}

/// Longitude of node (j, i) on the curvilinear test grid
pub fn curvilinear_lon(j: usize, i: usize) -> f64 {
    let (j, i) = (j as f64, i as f64);
    4.0 + 0.1 * i - 0.03 * j + 0.001 * i * j
}

/// Latitude of node (j, i) on the curvilinear test grid
pub fn curvilinear_lat(j: usize, i: usize) -> f64 {
    let (j, i) = (j as f64, i as f64);
    60.0 + 0.02 * i + 0.08 * j + 0.0005 * i * i
}

/// A rotated, sheared and slightly bent grid off the Norwegian coast
pub fn curvilinear_grid() -> Grid {
    let lon = Array2::from_shape_fn(CURVILINEAR_SHAPE, |(j, i)| curvilinear_lon(j, i));
    let lat = Array2::from_shape_fn(CURVILINEAR_SHAPE, |(j, i)| curvilinear_lat(j, i));
    Grid::new(lon, lat).unwrap()
}

/// The curvilinear grid with bathymetry deepening offshore and a 4-level
/// s-coordinate system
pub fn curvilinear_grid_3d() -> Grid {
    let h = Array2::from_shape_fn(CURVILINEAR_SHAPE, |(_, i)| 50.0 + 25.0 * i as f64);
    let vertical =
        VerticalGrid::from_stretching(4, 10.0, 5.0, 0.4, Vtransform::Modern, Vstretching::Shchepetkin)
            .unwrap();
    curvilinear_grid()
        .with_bathymetry(h)
        .unwrap()
        .with_vertical(vertical)
}

/// A 2-D field at `placement` whose value is `f(row, col)` in rho-index
/// space, so staggered samples can be checked against rho coordinates
pub fn index_field<F>(grid: &Grid, name: &str, placement: Placement, f: F) -> StaggeredField
where
    F: Fn(f64, f64) -> f64,
{
    let (row_offset, col_offset) = placement.offset();
    let data = Array2::from_shape_fn(placement.shape_on(grid.shape()), |(j, i)| {
        f(j as f64 + row_offset, i as f64 + col_offset)
    });
    StaggeredField::new(name, placement, data.into_dyn()).unwrap()
}

/// A 3-D rho field whose value at level k is `f(k, row, col)`
pub fn layered_field<F>(grid: &Grid, name: &str, n_levels: usize, f: F) -> StaggeredField
where
    F: Fn(usize, f64, f64) -> f64,
{
    let (rows, cols) = grid.shape();
    let data = Array3::from_shape_fn((n_levels, rows, cols), |(k, j, i)| f(k, j as f64, i as f64));
    StaggeredField::new(name, Placement::Rho, data.into_dyn()).unwrap()
}

#[cfg(feature = "netcdf")]
pub use roms_file::*;

#[cfg(feature = "netcdf")]
mod roms_file {
    use std::path::Path;

    use netcdf::Error;
    type Result<T> = std::result::Result<T, Error>;

    pub const ETA_RHO: usize = 4;
    pub const XI_RHO: usize = 5;
    pub const N_LEVELS: usize = 3;
    pub const N_TIMES: usize = 2;
    pub const HC: f64 = 10.0;
    pub const DEPTH: f64 = 100.0;
    pub const FILL_VALUE: f64 = 1.0e37;

    /// The land point of the ROMS fixture
    pub const LAND_POINT: (usize, usize) = (3, 4);

    /// Longitude of rho node (j, i) in the ROMS fixture
    pub fn fixture_lon(_j: usize, i: usize) -> f64 {
        4.0 + 0.1 * i as f64
    }

    /// Latitude of rho node (j, i) in the ROMS fixture
    pub fn fixture_lat(j: usize, _i: usize) -> f64 {
        60.0 + 0.1 * j as f64
    }

    /// Temperature at level k and time t, uniform in the horizontal
    pub fn fixture_temp(t: usize, k: usize) -> f64 {
        10.0 + k as f64 + 0.5 * t as f64
    }

    /// Creates a ROMS-like history file.
    ///
    /// The grid has 4x5 rho points, one land point, a flat 100 m bottom and
    /// 3 s-levels with linear stretching under Vtransform 2. Fields:
    /// `temp(ocean_time, s_rho, eta_rho, xi_rho)`,
    /// `zeta(ocean_time, eta_rho, xi_rho)`, `u(ocean_time, s_rho, eta_u, xi_u)`,
    /// `v(ocean_time, s_rho, eta_v, xi_v)` and the time-independent `h`.
    pub fn create_roms_nc(path: &Path) -> Result<()> {
        let mut file = netcdf::create(path)?;

        file.add_dimension("eta_rho", ETA_RHO)?;
        file.add_dimension("xi_rho", XI_RHO)?;
        file.add_dimension("eta_u", ETA_RHO)?;
        file.add_dimension("xi_u", XI_RHO - 1)?;
        file.add_dimension("eta_v", ETA_RHO - 1)?;
        file.add_dimension("xi_v", XI_RHO)?;
        file.add_dimension("s_rho", N_LEVELS)?;
        file.add_dimension("s_w", N_LEVELS + 1)?;
        file.add_unlimited_dimension("ocean_time")?;

        file.add_attribute("title", "ROMS test history file")?;
        file.add_attribute("type", "ROMS/TOMS history file")?;

        let rho_points = ETA_RHO * XI_RHO;
        let lon: Vec<f64> = (0..rho_points).map(|n| fixture_lon(n / XI_RHO, n % XI_RHO)).collect();
        let lat: Vec<f64> = (0..rho_points).map(|n| fixture_lat(n / XI_RHO, n % XI_RHO)).collect();
        let mask: Vec<f64> = (0..rho_points)
            .map(|n| if (n / XI_RHO, n % XI_RHO) == LAND_POINT { 0.0 } else { 1.0 })
            .collect();
        let h = vec![DEPTH; rho_points];

        let s_rho: Vec<f64> = (0..N_LEVELS)
            .map(|k| (k as f64 - N_LEVELS as f64 + 0.5) / N_LEVELS as f64)
            .collect();
        let s_w: Vec<f64> = (0..=N_LEVELS)
            .map(|k| (k as f64 - N_LEVELS as f64) / N_LEVELS as f64)
            .collect();

        {
            let mut var = file.add_variable::<f64>("lon_rho", &["eta_rho", "xi_rho"])?;
            var.put_attribute("units", "degree_east")?;
            var.put_values(&lon, &[.., ..])?;
        }
        {
            let mut var = file.add_variable::<f64>("lat_rho", &["eta_rho", "xi_rho"])?;
            var.put_attribute("units", "degree_north")?;
            var.put_values(&lat, &[.., ..])?;
        }
        {
            let mut var = file.add_variable::<f64>("mask_rho", &["eta_rho", "xi_rho"])?;
            var.put_attribute("long_name", "mask on RHO-points")?;
            var.put_values(&mask, &[.., ..])?;
        }
        {
            let mut var = file.add_variable::<f64>("h", &["eta_rho", "xi_rho"])?;
            var.put_attribute("units", "meter")?;
            var.put_values(&h, &[.., ..])?;
        }
        {
            let mut var = file.add_variable::<f64>("hc", &[])?;
            var.put_attribute("units", "meter")?;
            var.put_values(&[HC], ..)?;
        }
        {
            let mut var = file.add_variable::<i32>("Vtransform", &[])?;
            var.put_values(&[2], ..)?;
        }
        {
            let mut var = file.add_variable::<f64>("s_rho", &["s_rho"])?;
            var.put_values(&s_rho, &[..])?;
        }
        {
            // Linear stretching: Cs equals s
            let mut var = file.add_variable::<f64>("Cs_r", &["s_rho"])?;
            var.put_values(&s_rho, &[..])?;
        }
        {
            let mut var = file.add_variable::<f64>("s_w", &["s_w"])?;
            var.put_values(&s_w, &[..])?;
        }
        {
            let mut var = file.add_variable::<f64>("Cs_w", &["s_w"])?;
            var.put_values(&s_w, &[..])?;
        }
        {
            let mut var = file.add_variable::<f64>("ocean_time", &["ocean_time"])?;
            var.put_attribute("units", "seconds since 2000-01-01 00:00:00")?;
            var.put_values(&[0.0, 3600.0], &[..])?;
        }

        let mut temp = Vec::with_capacity(N_TIMES * N_LEVELS * rho_points);
        for t in 0..N_TIMES {
            for k in 0..N_LEVELS {
                for n in 0..rho_points {
                    if (n / XI_RHO, n % XI_RHO) == LAND_POINT {
                        temp.push(FILL_VALUE);
                    } else {
                        temp.push(fixture_temp(t, k));
                    }
                }
            }
        }
        {
            let mut var =
                file.add_variable::<f64>("temp", &["ocean_time", "s_rho", "eta_rho", "xi_rho"])?;
            var.put_attribute("units", "Celsius")?;
            var.put_attribute("_FillValue", FILL_VALUE)?;
            var.put_values(&temp, &[.., .., .., ..])?;
        }

        let zeta: Vec<f64> = (0..N_TIMES * rho_points)
            .map(|n| (n / rho_points) as f64 + 0.1 * ((n % rho_points) / XI_RHO) as f64)
            .collect();
        {
            let mut var = file.add_variable::<f64>("zeta", &["ocean_time", "eta_rho", "xi_rho"])?;
            var.put_attribute("units", "meter")?;
            var.put_values(&zeta, &[.., .., ..])?;
        }

        let u = vec![0.5; N_TIMES * N_LEVELS * ETA_RHO * (XI_RHO - 1)];
        {
            let mut var = file.add_variable::<f64>("u", &["ocean_time", "s_rho", "eta_u", "xi_u"])?;
            var.put_attribute("units", "meter second-1")?;
            var.put_values(&u, &[.., .., .., ..])?;
        }

        let v = vec![-0.25; N_TIMES * N_LEVELS * (ETA_RHO - 1) * XI_RHO];
        {
            let mut var = file.add_variable::<f64>("v", &["ocean_time", "s_rho", "eta_v", "xi_v"])?;
            var.put_attribute("units", "meter second-1")?;
            var.put_values(&v, &[.., .., .., ..])?;
        }

        Ok(())
    }

    /// Raw short of the packed salinity at level k and node (j, i)
    pub fn packed_salt_raw(k: usize, j: usize, i: usize) -> i16 {
        (100 * k + 10 * j + i) as i16
    }

    pub const SALT_SCALE: f64 = 0.01;
    pub const SALT_OFFSET: f64 = 30.0;
    pub const SALT_FILL: i16 = -32767;

    /// Stretching of the packed fixture, Cs = -s^2
    pub fn packed_cs(s: f64) -> f64 {
        -s * s
    }

    /// Creates a ROMS-like file in the style of older runs.
    ///
    /// There is no `Vtransform` variable, the stretching is non-linear and
    /// `salt(s_rho, eta_rho, xi_rho)` is stored as packed shorts with
    /// `scale_factor`, `add_offset` and a short `_FillValue` at the land point.
    pub fn create_packed_nc(path: &Path) -> Result<()> {
        let mut file = netcdf::create(path)?;

        file.add_dimension("eta_rho", ETA_RHO)?;
        file.add_dimension("xi_rho", XI_RHO)?;
        file.add_dimension("s_rho", N_LEVELS)?;

        let rho_points = ETA_RHO * XI_RHO;
        let lon: Vec<f64> = (0..rho_points).map(|n| fixture_lon(n / XI_RHO, n % XI_RHO)).collect();
        let lat: Vec<f64> = (0..rho_points).map(|n| fixture_lat(n / XI_RHO, n % XI_RHO)).collect();
        let mask: Vec<f64> = (0..rho_points)
            .map(|n| if (n / XI_RHO, n % XI_RHO) == LAND_POINT { 0.0 } else { 1.0 })
            .collect();
        let h = vec![DEPTH; rho_points];
        let s_rho: Vec<f64> = (0..N_LEVELS)
            .map(|k| (k as f64 - N_LEVELS as f64 + 0.5) / N_LEVELS as f64)
            .collect();
        let cs_r: Vec<f64> = s_rho.iter().map(|&s| packed_cs(s)).collect();

        file.add_variable::<f64>("lon_rho", &["eta_rho", "xi_rho"])?
            .put_values(&lon, &[.., ..])?;
        file.add_variable::<f64>("lat_rho", &["eta_rho", "xi_rho"])?
            .put_values(&lat, &[.., ..])?;
        file.add_variable::<f64>("mask_rho", &["eta_rho", "xi_rho"])?
            .put_values(&mask, &[.., ..])?;
        file.add_variable::<f64>("h", &["eta_rho", "xi_rho"])?
            .put_values(&h, &[.., ..])?;
        file.add_variable::<f64>("hc", &[])?.put_values(&[HC], ..)?;
        file.add_variable::<f64>("s_rho", &["s_rho"])?
            .put_values(&s_rho, &[..])?;
        file.add_variable::<f64>("Cs_r", &["s_rho"])?
            .put_values(&cs_r, &[..])?;

        let mut salt = Vec::with_capacity(N_LEVELS * rho_points);
        for k in 0..N_LEVELS {
            for n in 0..rho_points {
                let (j, i) = (n / XI_RHO, n % XI_RHO);
                if (j, i) == LAND_POINT {
                    salt.push(SALT_FILL);
                } else {
                    salt.push(packed_salt_raw(k, j, i));
                }
            }
        }
        {
            let mut var = file.add_variable::<i16>("salt", &["s_rho", "eta_rho", "xi_rho"])?;
            var.put_attribute("_FillValue", SALT_FILL)?;
            var.put_attribute("scale_factor", SALT_SCALE)?;
            var.put_attribute("add_offset", SALT_OFFSET)?;
            var.put_values(&salt, &[.., .., ..])?;
        }

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::tempdir;

        #[test]
        fn test_create_roms_nc() {
            let dir = tempdir().unwrap();
            let file_path = dir.path().join("ocean_his.nc");

            create_roms_nc(&file_path).unwrap();
            assert!(file_path.exists());

            let file = netcdf::open(&file_path).unwrap();
            assert!(file.variable("lon_rho").is_some());
            assert!(file.variable("temp").is_some());
            assert_eq!(file.dimension("ocean_time").unwrap().len(), N_TIMES);
        }
    }
}
