//! # xroms
//!
//! Grid lookup and section extraction for ROMS ocean model output.
//!
//! ROMS stores its fields on a curvilinear Arakawa C-grid: tracers sit at rho
//! points, velocities at u and v points staggered half a cell from them, and
//! the vertical axis follows terrain through s-coordinates. This library maps
//! geographic positions onto that grid and samples fields along arbitrary
//! paths, producing vertical sections with along-track distance and depth.
//!
//! ## Key Features
//!
//! - **Grid lookup**: lon/lat to fractional grid index through inverse bilinear mapping
//! - **Staggered fields**: rho, u, v and psi placements with their own masks
//! - **Sections**: great-circle paths, configurable out-of-domain handling, land masking
//! - **s-coordinates**: Vtransform 1 and 2 depths for rho and w levels
//!
//! ## Architecture
//!
//! - **Data Layer**: [`data_loader`] reads ROMS NetCDF files into a [`Dataset`]
//! - **Geometry**: [`grid`], [`lonlat`] and [`vertical`] describe where values live
//! - **Processing**: [`interpolation`] and [`section`] sample fields along paths

pub mod config;
#[cfg(feature = "netcdf")]
pub mod data_loader;
pub mod dataset;
pub mod error;
pub mod field;
pub mod grid;
pub mod interpolation;
pub mod logging;
pub mod lonlat;
pub mod section;
pub mod vertical;

pub use config::Config;
pub use dataset::{AttributeValue, Dataset};
pub use error::{Result, XromsError};
pub use field::{FieldRegistry, Placement, StaggeredField};
pub use grid::{Grid, GridCoord};
pub use logging::{
    generate_operation_id, init_tracing, log_data_load_stats, log_error, log_operation_end,
    log_operation_start, log_section_stats, log_timed_operation,
};
pub use lonlat::LonLat;
pub use section::{OutOfDomainPolicy, Path, SectionExtractor, SectionOptions, SectionResult};
pub use vertical::{VerticalGrid, Vstretching, Vtransform};
