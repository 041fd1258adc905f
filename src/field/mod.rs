//! Named physical fields on the staggered grid.
//!
//! A [`StaggeredField`] couples a variable name with its C-grid
//! [`Placement`] and its array. The [`FieldRegistry`] is the uniform
//! `get(name)` access point used by section extraction.

pub mod placement;

pub use placement::Placement;

use ndarray::{ArrayD, ArrayView2, Axis, Ix2};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{Result, XromsError};
use crate::grid::Grid;

/// Placements of the standard ROMS output variables
static ROMS_PLACEMENTS: Lazy<HashMap<&'static str, Placement>> = Lazy::new(|| {
    HashMap::from([
        ("temp", Placement::Rho),
        ("salt", Placement::Rho),
        ("rho", Placement::Rho),
        ("zeta", Placement::Rho),
        ("h", Placement::Rho),
        ("AKt", Placement::Rho),
        ("u", Placement::U),
        ("ubar", Placement::U),
        ("sustr", Placement::U),
        ("bustr", Placement::U),
        ("v", Placement::V),
        ("vbar", Placement::V),
        ("svstr", Placement::V),
        ("bvstr", Placement::V),
    ])
});

/// Default placement of a standard ROMS variable name
pub fn default_placement(name: &str) -> Option<Placement> {
    ROMS_PLACEMENTS.get(name).copied()
}

/// A named quantity on one of the C-grid placements.
///
/// The array is either 2-D `(eta, xi)` or 3-D `(s, eta, xi)` with levels
/// ordered bottom to top.
#[derive(Debug, Clone)]
pub struct StaggeredField {
    name: String,
    placement: Placement,
    data: ArrayD<f64>,
}

impl StaggeredField {
    pub fn new(name: impl Into<String>, placement: Placement, data: ArrayD<f64>) -> Result<Self> {
        let name = name.into();
        if data.ndim() != 2 && data.ndim() != 3 {
            return Err(XromsError::InvalidParameter {
                param: name,
                message: format!("Field must be 2-D or 3-D, got {} dimensions", data.ndim()),
            });
        }
        Ok(Self {
            name,
            placement,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Horizontal (eta, xi) shape
    pub fn horizontal_shape(&self) -> (usize, usize) {
        let shape = self.data.shape();
        let n = shape.len();
        (shape[n - 2], shape[n - 1])
    }

    /// Number of vertical levels, `None` for 2-D fields
    pub fn n_levels(&self) -> Option<usize> {
        match self.data.ndim() {
            3 => Some(self.data.shape()[0]),
            _ => None,
        }
    }

    pub fn is_3d(&self) -> bool {
        self.n_levels().is_some()
    }

    /// Horizontal slice at a vertical level. 2-D fields ignore the level.
    pub fn level(&self, k: usize) -> Result<ArrayView2<'_, f64>> {
        let view = if self.is_3d() {
            let levels = self.data.shape()[0];
            if k >= levels {
                return Err(XromsError::InvalidParameter {
                    param: "level".to_string(),
                    message: format!("Level {} out of range for {} ({} levels)", k, self.name, levels),
                });
            }
            self.data.index_axis(Axis(0), k)
        } else {
            self.data.view()
        };

        view.into_dimensionality::<Ix2>()
            .map_err(XromsError::from)
    }

    /// Check the array against the placement's shape on `grid`
    pub fn validate_against(&self, grid: &Grid) -> Result<()> {
        self.check_shape(grid.shape(), grid.vertical().map(|v| v.n_levels()))
    }

    /// Check the horizontal shape against a rho grid of `grid_shape`, and
    /// the level count against `grid_levels` when both are known
    fn check_shape(&self, grid_shape: (usize, usize), grid_levels: Option<usize>) -> Result<()> {
        let expected = self.placement.shape_on(grid_shape);
        let levels_ok = match (self.n_levels(), grid_levels) {
            (Some(levels), Some(grid_levels)) => levels == grid_levels,
            _ => true,
        };

        if self.horizontal_shape() != expected || !levels_ok {
            let mut expected_shape = vec![expected.0, expected.1];
            if let Some(levels) = self.n_levels() {
                expected_shape.insert(0, grid_levels.unwrap_or(levels));
            }
            return Err(XromsError::shape_mismatch(
                &self.name,
                &expected_shape,
                self.data.shape(),
            ));
        }

        Ok(())
    }
}

/// Registry of fields defined on one grid
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    grid_shape: (usize, usize),
    n_levels: Option<usize>,
    fields: HashMap<String, StaggeredField>,
}

impl FieldRegistry {
    pub fn new(grid: &Grid) -> Self {
        Self {
            grid_shape: grid.shape(),
            n_levels: grid.vertical().map(|v| v.n_levels()),
            fields: HashMap::new(),
        }
    }

    /// Register a field, replacing any field with the same name
    pub fn insert(&mut self, field: StaggeredField) -> Result<()> {
        field.check_shape(self.grid_shape, self.n_levels)?;
        self.fields.insert(field.name().to_string(), field);
        Ok(())
    }

    /// Register an array under a standard ROMS name, using its default placement
    pub fn insert_array(&mut self, name: &str, data: ArrayD<f64>) -> Result<()> {
        let placement = default_placement(name).ok_or_else(|| XromsError::InvalidParameter {
            param: name.to_string(),
            message: "No default placement for this variable, give one explicitly".to_string(),
        })?;
        self.insert(StaggeredField::new(name, placement, data)?)
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Result<&StaggeredField> {
        self.fields
            .get(name)
            .ok_or_else(|| XromsError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
