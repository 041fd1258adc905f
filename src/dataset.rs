//! In-memory ROMS dataset.
//!
//! Bundles the grid, the registered fields and the global attributes of a
//! model output file, as produced by the loader or assembled by hand.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::field::{FieldRegistry, StaggeredField};
use crate::grid::Grid;
use crate::section::{Path, SectionExtractor, SectionOptions, SectionResult};

/// Possible attribute values in a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// Numeric attribute (stored as f64 for simplicity)
    Number(f64),
    /// Array of numbers
    NumberArray(Vec<f64>),
}

/// Grid, fields and attributes of one model output
#[derive(Debug, Clone)]
pub struct Dataset {
    grid: Grid,
    fields: FieldRegistry,
    attributes: HashMap<String, AttributeValue>,
}

impl Dataset {
    /// Create an empty dataset on `grid`
    pub fn new(grid: Grid) -> Self {
        let fields = FieldRegistry::new(&grid);
        Self {
            grid,
            fields,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, AttributeValue>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    /// Register a field on the dataset grid
    pub fn add_field(&mut self, field: StaggeredField) -> Result<()> {
        self.fields.insert(field)
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Result<&StaggeredField> {
        self.fields.get(name)
    }

    /// Extract a section of the named variable along `path`
    pub fn section(&self, name: &str, path: &Path, options: SectionOptions) -> Result<SectionResult> {
        let field = self.fields.get(name)?;
        SectionExtractor::new(&self.grid, options)?.extract(path, field)
    }
}
