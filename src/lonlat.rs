//! Geographic utility functions.
//!
//! Great-circle distances and interpolation on a spherical earth, used to
//! measure distance along a section path and to build straight sections.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, XromsError};

/// Mean earth radius in metres
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    /// Longitude in degrees east
    pub lon: f64,
    /// Latitude in degrees north
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl FromStr for LonLat {
    type Err = XromsError;

    /// Parse a "lon,lat" pair
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(XromsError::InvalidParameter {
                param: "point".to_string(),
                message: format!("Point must be in format 'lon,lat', got '{}'", s),
            });
        }

        let lon = parts[0]
            .parse::<f64>()
            .map_err(|_| XromsError::InvalidParameter {
                param: "point".to_string(),
                message: format!("Invalid longitude: {}", parts[0]),
            })?;
        let lat = parts[1]
            .parse::<f64>()
            .map_err(|_| XromsError::InvalidParameter {
                param: "point".to_string(),
                message: format!("Invalid latitude: {}", parts[1]),
            })?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(XromsError::InvalidParameter {
                param: "point".to_string(),
                message: "Latitude must be in the range -90 to 90".to_string(),
            });
        }

        Ok(LonLat { lon, lat })
    }
}

/// Parse a list of points "lon,lat;lon,lat;..."
pub fn parse_points(s: &str) -> Result<Vec<LonLat>> {
    s.split(';')
        .filter(|p| !p.trim().is_empty())
        .map(LonLat::from_str)
        .collect()
}

/// Great-circle distance in metres (haversine formula)
pub fn distance(a: LonLat, b: LonLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
}

/// Cumulative distance along a sequence of points, starting at zero
pub fn cumulative_distance(points: &[LonLat]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += distance(points[i - 1], *p);
        }
        out.push(total);
    }
    out
}

/// Point a fraction `f` of the way from `a` to `b` along the great circle
pub fn interpolate_great_circle(a: LonLat, b: LonLat, f: f64) -> LonLat {
    let d = distance(a, b) / EARTH_RADIUS;
    if d < 1e-12 {
        return a;
    }

    let (phi1, lam1) = (a.lat.to_radians(), a.lon.to_radians());
    let (phi2, lam2) = (b.lat.to_radians(), b.lon.to_radians());

    let wa = ((1.0 - f) * d).sin() / d.sin();
    let wb = (f * d).sin() / d.sin();

    let x = wa * phi1.cos() * lam1.cos() + wb * phi2.cos() * lam2.cos();
    let y = wa * phi1.cos() * lam1.sin() + wb * phi2.cos() * lam2.sin();
    let z = wa * phi1.sin() + wb * phi2.sin();

    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let mut lon = y.atan2(x).to_degrees();

    // Keep the longitude on the same branch as the endpoints
    let reference = a.lon + f * (b.lon - a.lon);
    while lon - reference > 180.0 {
        lon -= 360.0;
    }
    while lon - reference < -180.0 {
        lon += 360.0;
    }

    LonLat { lon, lat }
}

/// Local planar offset (east, north) in metres of `p` relative to `origin`.
/// Used for nearest-point searches where only relative size matters.
pub fn local_offset(origin: LonLat, p: LonLat) -> (f64, f64) {
    let coslat = origin.lat.to_radians().cos();
    let dx = (p.lon - origin.lon).to_radians() * coslat * EARTH_RADIUS;
    let dy = (p.lat - origin.lat).to_radians() * EARTH_RADIUS;
    (dx, dy)
}
