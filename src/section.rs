//! Section extraction.
//!
//! A section walks a geographic [`Path`] through the grid, resolves every
//! station to a fractional grid index and samples fields there. 3-D fields
//! are sampled at every s-level, with depths taken from the bathymetry at the
//! station.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{Result, XromsError};
use crate::field::{Placement, StaggeredField};
use crate::grid::{Grid, GridCoord};
use crate::interpolation::{get_interpolator, Interpolator};
use crate::lonlat::{self, LonLat};

/// What to do with path points outside the grid domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfDomainPolicy {
    /// Fail the whole extraction with `OutOfDomain`
    #[default]
    Propagate,
    /// Use the nearest grid node instead
    Clip,
    /// Leave the station out of the result
    Skip,
}

impl FromStr for OutOfDomainPolicy {
    type Err = XromsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(OutOfDomainPolicy::Propagate),
            "clip" => Ok(OutOfDomainPolicy::Clip),
            "skip" => Ok(OutOfDomainPolicy::Skip),
            _ => Err(XromsError::InvalidParameter {
                param: "policy".to_string(),
                message: format!(
                    "Unknown out-of-domain policy: {}. Must be one of: propagate, clip, skip",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for OutOfDomainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutOfDomainPolicy::Propagate => "propagate",
            OutOfDomainPolicy::Clip => "clip",
            OutOfDomainPolicy::Skip => "skip",
        };
        f.write_str(name)
    }
}

/// An ordered sequence of geographic points.
///
/// At least two points; consecutive points differ, except for a fully
/// stationary path where every point is the same station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    points: Vec<LonLat>,
}

impl Path {
    pub fn new(points: Vec<LonLat>) -> Result<Self> {
        if points.len() < 2 {
            return Err(XromsError::InvalidPath {
                message: format!("A path needs at least two points, got {}", points.len()),
            });
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(XromsError::InvalidPath {
                message: format!("Non-finite point ({}, {})", p.lon, p.lat),
            });
        }

        let stationary = points.iter().all(|p| *p == points[0]);
        if !stationary {
            if let Some(i) = points.windows(2).position(|w| w[0] == w[1]) {
                return Err(XromsError::InvalidPath {
                    message: format!("Points {} and {} coincide", i, i + 1),
                });
            }
        }

        Ok(Self { points })
    }

    /// `n` evenly spaced points along the great circle from `start` to `end`
    pub fn straight(start: LonLat, end: LonLat, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(XromsError::InvalidPath {
                message: format!("A straight section needs at least two points, got {}", n),
            });
        }
        if start == end {
            return Err(XromsError::InvalidPath {
                message: "Start and end of a straight section coincide".to_string(),
            });
        }

        let points = (0..n)
            .map(|k| lonlat::interpolate_great_circle(start, end, k as f64 / (n - 1) as f64))
            .collect();
        Self::new(points)
    }

    /// Insert points so no leg is longer than `max_step` metres
    pub fn densify(&self, max_step: f64) -> Result<Self> {
        if !(max_step > 0.0) {
            return Err(XromsError::InvalidParameter {
                param: "max_step".to_string(),
                message: format!("Step must be positive, got {}", max_step),
            });
        }
        if self.is_stationary() {
            return Ok(self.clone());
        }

        let mut points = vec![self.points[0]];
        for leg in self.points.windows(2) {
            let steps = (lonlat::distance(leg[0], leg[1]) / max_step).ceil().max(1.0) as usize;
            for k in 1..=steps {
                points.push(lonlat::interpolate_great_circle(
                    leg[0],
                    leg[1],
                    k as f64 / steps as f64,
                ));
            }
        }
        Self::new(points)
    }

    pub fn points(&self) -> &[LonLat] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A constructed path is never empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_stationary(&self) -> bool {
        self.points.iter().all(|p| *p == self.points[0])
    }

    /// Cumulative great-circle distance in metres at each point
    pub fn distances(&self) -> Vec<f64> {
        lonlat::cumulative_distance(&self.points)
    }
}

/// Options controlling section extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOptions {
    /// Handling of path points outside the grid
    #[serde(default)]
    pub policy: OutOfDomainPolicy,
    /// Interpolation method name
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
    /// Value reported where every contributing point is land
    #[serde(default = "default_land_value")]
    pub land_value: f64,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            policy: OutOfDomainPolicy::default(),
            interpolation: default_interpolation(),
            land_value: default_land_value(),
        }
    }
}

fn default_interpolation() -> String {
    "bilinear".to_string()
}

fn default_land_value() -> f64 {
    f64::NAN
}

/// A path point resolved on the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Station {
    /// Geographic position on the path
    pub position: LonLat,
    /// Distance along the path in metres
    pub distance: f64,
    /// Fractional grid index where the station is sampled
    pub coord: GridCoord,
    /// Whether the position was outside the grid and moved to the nearest node
    pub clipped: bool,
}

/// One sample of a section
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionSample {
    /// Distance along the path in metres
    pub distance: f64,
    /// Depth below the surface in metres, `None` for 2-D fields
    pub depth: Option<f64>,
    pub value: f64,
}

/// Field values along a section.
///
/// Samples are ordered by station, and within a station from the bottom
/// level up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionResult {
    field: String,
    placement: Placement,
    n_levels: usize,
    stations: Vec<Station>,
    samples: Vec<SectionSample>,
}

impl SectionResult {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Number of levels per station, 1 for 2-D fields
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn samples(&self) -> &[SectionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Values as a `(levels, stations)` array
    pub fn values(&self) -> Array2<f64> {
        let n_stations = self.stations.len();
        Array2::from_shape_fn((self.n_levels, n_stations), |(k, s)| {
            self.samples[s * self.n_levels + k].value
        })
    }

    /// Depths as a `(levels, stations)` array, `None` for 2-D fields
    pub fn depths(&self) -> Option<Array2<f64>> {
        if self.samples.first()?.depth.is_none() {
            return None;
        }
        let n_stations = self.stations.len();
        Some(Array2::from_shape_fn((self.n_levels, n_stations), |(k, s)| {
            self.samples[s * self.n_levels + k].depth.unwrap_or(f64::NAN)
        }))
    }
}

/// Extracts sections of fields on one grid
pub struct SectionExtractor<'a> {
    grid: &'a Grid,
    options: SectionOptions,
    interpolator: Box<dyn Interpolator>,
}

impl<'a> SectionExtractor<'a> {
    pub fn new(grid: &'a Grid, options: SectionOptions) -> Result<Self> {
        let interpolator = get_interpolator(&options.interpolation)?;
        Ok(Self {
            grid,
            options,
            interpolator,
        })
    }

    pub fn options(&self) -> &SectionOptions {
        &self.options
    }

    /// Resolve every path point to a grid position according to the policy
    pub fn resolve(&self, path: &Path) -> Result<Vec<Station>> {
        let distances = path.distances();
        let mut stations = Vec::with_capacity(path.len());

        for (&position, &distance) in path.points().iter().zip(&distances) {
            match self.grid.lonlat_to_index(position) {
                Ok(coord) => stations.push(Station {
                    position,
                    distance,
                    coord,
                    clipped: false,
                }),
                Err(e) if e.is_out_of_domain() => match self.options.policy {
                    OutOfDomainPolicy::Propagate => return Err(e),
                    OutOfDomainPolicy::Clip => {
                        let (j, i) = self.grid.nearest(position);
                        debug!(lon = position.lon, lat = position.lat, row = j, col = i, "Clipping station to grid");
                        stations.push(Station {
                            position,
                            distance,
                            coord: GridCoord::new(j as f64, i as f64),
                            clipped: true,
                        });
                    }
                    OutOfDomainPolicy::Skip => {
                        debug!(lon = position.lon, lat = position.lat, "Skipping station outside grid");
                    }
                },
                Err(e) => return Err(e),
            }
        }

        if stations.len() < path.len() {
            warn!(
                skipped = path.len() - stations.len(),
                total = path.len(),
                "Stations outside the grid were skipped"
            );
        }

        Ok(stations)
    }

    /// Extract a section of `field` along `path`
    pub fn extract(&self, path: &Path, field: &StaggeredField) -> Result<SectionResult> {
        let stations = self.resolve(path)?;
        self.sample_stations(&stations, field)
    }

    /// Extract several fields along the same path, resolving it once
    pub fn extract_many(&self, path: &Path, fields: &[&StaggeredField]) -> Result<Vec<SectionResult>> {
        let stations = self.resolve(path)?;
        fields
            .iter()
            .map(|field| self.sample_stations(&stations, field))
            .collect()
    }

    /// Sample a field at already resolved stations
    pub fn sample_stations(&self, stations: &[Station], field: &StaggeredField) -> Result<SectionResult> {
        field.validate_against(self.grid)?;

        let placement = field.placement();
        let n_levels = field.n_levels().unwrap_or(1);
        let mut samples = Vec::with_capacity(stations.len() * n_levels);

        debug!(
            field = field.name(),
            placement = %placement,
            stations = stations.len(),
            levels = n_levels,
            method = self.interpolator.name(),
            "Sampling section"
        );

        for station in stations {
            let depths = if field.is_3d() {
                Some(self.station_depths(station)?)
            } else {
                None
            };

            for k in 0..n_levels {
                let value = placement
                    .sample(self.grid, field.level(k)?, station.coord, self.interpolator.as_ref())?
                    .unwrap_or(self.options.land_value);
                samples.push(SectionSample {
                    distance: station.distance,
                    depth: depths.as_ref().map(|d| d[k]),
                    value,
                });
            }
        }

        Ok(SectionResult {
            field: field.name().to_string(),
            placement,
            n_levels,
            stations: stations.to_vec(),
            samples,
        })
    }

    /// Depths (positive down) of the rho-levels at a station
    fn station_depths(&self, station: &Station) -> Result<Vec<f64>> {
        let vertical = self.grid.vertical().ok_or_else(|| XromsError::DataNotFound {
            message: "3-D section requires a vertical grid".to_string(),
        })?;
        let h = self.grid.bathymetry_at(station.coord)?;
        Ok(vertical.z_rho(h).into_iter().map(|z| -z).collect())
    }
}
