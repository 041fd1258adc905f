//! NetCDF loading of ROMS output.
//!
//! This module reads a ROMS grid, history or average file into an in-memory
//! [`Dataset`]: the rho-point coordinates, mask, bathymetry and s-coordinate
//! description become the [`Grid`], and every variable laid out on ROMS
//! horizontal dimensions becomes a [`StaggeredField`].

use ndarray::{Array2, ArrayD, Axis, Ix2, IxDyn};
use netcdf::{self, Attribute, Variable as NetCDFVariable};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::dataset::{AttributeValue, Dataset};
use crate::error::{Result, XromsError};
use crate::field::{Placement, StaggeredField};
use crate::grid::Grid;
use crate::logging::log_data_load_stats;
use crate::vertical::{VerticalGrid, Vtransform};

/// Values at or above this magnitude are ROMS fill values
const ROMS_FILL_THRESHOLD: f64 = 1.0e36;

/// Load a ROMS NetCDF file, reading `time_index` from time-dependent variables
pub fn load_roms_file(path: &Path, time_index: usize) -> Result<Dataset> {
    // Check if the file exists
    if !path.exists() {
        return Err(XromsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let file = netcdf::open(path)?;
    info!("Opened NetCDF file: {}", path.display());
    debug!("File has {} variables", file.variables().count());

    let grid = read_grid(&file)?;
    let attributes = read_attributes(file.attributes());
    let mut dataset = Dataset::new(grid).with_attributes(attributes);

    let mut memory_usage = 0;
    for var in file.variables() {
        let name = var.name();
        if is_grid_variable(&name) {
            continue;
        }
        if let Some(field) = read_field(&var, time_index)? {
            memory_usage += field.data().len() * std::mem::size_of::<f64>();
            dataset.add_field(field)?;
        }
    }

    if dataset.fields().is_empty() {
        warn!("No fields on ROMS horizontal dimensions in {}", path.display());
    }

    log_data_load_stats(
        &path.display().to_string(),
        &dataset.fields().names(),
        dataset.grid().shape(),
        dataset.grid().vertical().map(|v| v.n_levels()),
        memory_usage,
    );

    Ok(dataset)
}

/// Build the grid from lon_rho/lat_rho plus the optional mask, bathymetry
/// and s-coordinate variables
fn read_grid(file: &netcdf::File) -> Result<Grid> {
    let lon = read_2d(file, "lon_rho")?.ok_or_else(|| XromsError::DataNotFound {
        message: "Variable lon_rho not found".to_string(),
    })?;
    let lat = read_2d(file, "lat_rho")?.ok_or_else(|| XromsError::DataNotFound {
        message: "Variable lat_rho not found".to_string(),
    })?;

    let mut grid = Grid::new(lon, lat)?;

    if let Some(mask) = read_2d(file, "mask_rho")? {
        grid = grid.with_mask(mask.mapv(|m| m > 0.5))?;
    }
    if let Some(h) = read_2d(file, "h")? {
        grid = grid.with_bathymetry(h)?;
    }
    if let Some(vertical) = read_vertical(file)? {
        debug!(levels = vertical.n_levels(), vtransform = %vertical.vtransform(), "Read vertical grid");
        grid = grid.with_vertical(vertical);
    }

    Ok(grid)
}

/// Read the s-coordinate description; absent in pure grid files
fn read_vertical(file: &netcdf::File) -> Result<Option<VerticalGrid>> {
    let (s_rho, cs_r, hc) = match (
        read_1d(file, "s_rho")?,
        read_1d(file, "Cs_r")?,
        read_scalar(file, "hc")?,
    ) {
        (Some(s_rho), Some(cs_r), Some(hc)) => (s_rho, cs_r, hc),
        _ => return Ok(None),
    };

    // Files written before Vtransform existed use the original transform
    let vtransform = match read_scalar(file, "Vtransform")? {
        Some(code) => Vtransform::from_code(code.round() as i32)?,
        None => {
            warn!("Vtransform not found, assuming Vtransform=1");
            Vtransform::Original
        }
    };

    let mut vertical = VerticalGrid::new(hc, s_rho, cs_r, vtransform)?;
    if let (Some(s_w), Some(cs_w)) = (read_1d(file, "s_w")?, read_1d(file, "Cs_w")?) {
        vertical = vertical.with_w_levels(s_w, cs_w)?;
    }
    Ok(Some(vertical))
}

/// Coordinate and mask variables that belong to the grid, not the fields
fn is_grid_variable(name: &str) -> bool {
    ["lon_", "lat_", "mask_", "x_", "y_"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || name == "angle"
}

fn is_time_dimension(dim: &netcdf::Dimension) -> bool {
    dim.is_unlimited() || dim.name().contains("time")
}

/// Read a variable on ROMS horizontal dimensions as a field.
///
/// Returns `Ok(None)` for variables that are not fields or whose vertical
/// layout is not supported.
fn read_field(var: &NetCDFVariable, time_index: usize) -> Result<Option<StaggeredField>> {
    let name = var.name();
    let dims = var.dimensions();
    let dim_names: Vec<String> = dims.iter().map(|d| d.name()).collect();

    let Some(placement) = Placement::from_dimensions(&dim_names) else {
        return Ok(None);
    };

    let mut array = match read_variable(var) {
        Ok(array) => array,
        Err(e) => {
            warn!("Skipping unreadable variable {}: {}", name, e);
            return Ok(None);
        }
    };

    let mut leading: Vec<&str> = dim_names[..dim_names.len() - 2].iter().map(String::as_str).collect();
    if !leading.is_empty() && is_time_dimension(&dims[0]) {
        let n_times = array.shape()[0];
        if time_index >= n_times {
            return Err(XromsError::InvalidParameter {
                param: "time_index".to_string(),
                message: format!(
                    "Time index {} out of range for {} ({} records)",
                    time_index, name, n_times
                ),
            });
        }
        array = array.index_axis_move(Axis(0), time_index);
        leading.remove(0);
    }

    match leading.as_slice() {
        [] | ["s_rho"] => {}
        other => {
            warn!("Skipping variable {} with unsupported dimensions {:?}", name, other);
            return Ok(None);
        }
    }

    debug!(variable = %name, placement = %placement, shape = ?array.shape(), "Read field");
    Ok(Some(StaggeredField::new(name, placement, array)?))
}

/// Read a whole variable as f64, applying fill values and packing attributes
fn read_variable(var: &NetCDFVariable) -> Result<ArrayD<f64>> {
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let values: Vec<f64> = var.get_values::<f64, _>(&[] as &[netcdf::Extent])?;
    let mut array = ArrayD::from_shape_vec(IxDyn(&shape), values)?;

    let fill = numeric_attribute(var, "_FillValue");
    let scale = numeric_attribute(var, "scale_factor").unwrap_or(1.0);
    let offset = numeric_attribute(var, "add_offset").unwrap_or(0.0);

    array.mapv_inplace(|v| {
        if Some(v) == fill || v.abs() >= ROMS_FILL_THRESHOLD {
            f64::NAN
        } else {
            v * scale + offset
        }
    });
    Ok(array)
}

fn read_2d(file: &netcdf::File, name: &str) -> Result<Option<Array2<f64>>> {
    match file.variable(name) {
        Some(var) => {
            let array = read_variable(&var)?;
            Ok(Some(array.into_dimensionality::<Ix2>()?))
        }
        None => Ok(None),
    }
}

fn read_1d(file: &netcdf::File, name: &str) -> Result<Option<Vec<f64>>> {
    match file.variable(name) {
        Some(var) => Ok(Some(read_variable(&var)?.into_raw_vec())),
        None => Ok(None),
    }
}

fn read_scalar(file: &netcdf::File, name: &str) -> Result<Option<f64>> {
    Ok(read_1d(file, name)?.and_then(|values| values.first().copied()))
}

fn numeric_attribute(var: &NetCDFVariable, name: &str) -> Option<f64> {
    let attr = var.attribute(name)?;
    match convert_attribute(&attr) {
        Some(AttributeValue::Number(v)) => Some(v),
        _ => None,
    }
}

fn read_attributes<'a>(attrs: impl Iterator<Item = Attribute<'a>>) -> HashMap<String, AttributeValue> {
    let mut attributes = HashMap::new();
    for attr in attrs {
        if let Some(value) = convert_attribute(&attr) {
            attributes.insert(attr.name().to_string(), value);
        }
    }
    attributes
}

/// Convert a NetCDF attribute to our AttributeValue enum
fn convert_attribute(attr: &Attribute) -> Option<AttributeValue> {
    use netcdf::AttributeValue as NcAttributeValue;

    let value = match attr.value() {
        Ok(value) => value,
        Err(e) => {
            warn!("Unreadable attribute {}: {}", attr.name(), e);
            return None;
        }
    };

    let converted = match value {
        // String types
        NcAttributeValue::Str(s) => AttributeValue::Text(s),

        // Numeric types - store as f64 for simplicity
        NcAttributeValue::Uchar(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Schar(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Short(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Int(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Float(v) => AttributeValue::Number(v as f64),
        NcAttributeValue::Double(v) => AttributeValue::Number(v),

        // Arrays, e.g. the stretching parameters of older ROMS files
        NcAttributeValue::Shorts(v) => AttributeValue::NumberArray(v.into_iter().map(f64::from).collect()),
        NcAttributeValue::Ints(v) => AttributeValue::NumberArray(v.into_iter().map(f64::from).collect()),
        NcAttributeValue::Floats(v) => AttributeValue::NumberArray(v.into_iter().map(f64::from).collect()),
        NcAttributeValue::Doubles(v) => AttributeValue::NumberArray(v),

        other => AttributeValue::Text(format!("{:?}", other)),
    };
    Some(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found() {
        let result = load_roms_file(Path::new("/nonexistent/ocean_his.nc"), 0);
        assert!(result.is_err());
        match result.unwrap_err() {
            XromsError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected IO error"),
        }
    }

    #[test]
    fn test_grid_variable_names() {
        assert!(is_grid_variable("lon_rho"));
        assert!(is_grid_variable("mask_u"));
        assert!(is_grid_variable("angle"));
        assert!(!is_grid_variable("temp"));
        assert!(!is_grid_variable("h"));
    }
}
