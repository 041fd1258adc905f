//! ROMS vertical s-coordinates.
//!
//! Depths of the rho- and w-levels follow from the bathymetry, the critical
//! depth `hc`, the s-coordinate values and their stretching curves `C(s)`.
//! The free surface is taken as zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, XromsError};

/// Vertical transformation equation (ROMS `Vtransform`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vtransform {
    /// `Vtransform = 1`: z = hc*s + (h - hc)*C
    Original,
    /// `Vtransform = 2`: z = h * (hc*s + h*C) / (hc + h)
    Modern,
}

impl Vtransform {
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Vtransform::Original),
            2 => Ok(Vtransform::Modern),
            _ => Err(XromsError::InvalidParameter {
                param: "Vtransform".to_string(),
                message: format!("Unsupported Vtransform: {}, must be 1 or 2", code),
            }),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Vtransform::Original => 1,
            Vtransform::Modern => 2,
        }
    }
}

impl fmt::Display for Vtransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vtransform={}", self.code())
    }
}

/// Vertical stretching function (ROMS `Vstretching`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vstretching {
    /// Song and Haidvogel (1994)
    SongHaidvogel,
    /// Shchepetkin (2010)
    Shchepetkin,
}

impl Vstretching {
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Vstretching::SongHaidvogel),
            4 => Ok(Vstretching::Shchepetkin),
            _ => Err(XromsError::InvalidParameter {
                param: "Vstretching".to_string(),
                message: format!("Unsupported Vstretching: {}, must be 1 or 4", code),
            }),
        }
    }

    /// Stretching curve C(s) for s in [-1, 0]
    pub fn curve(self, s: f64, theta_s: f64, theta_b: f64) -> f64 {
        match self {
            Vstretching::SongHaidvogel => {
                if theta_s <= 0.0 {
                    return s;
                }
                let surface = (theta_s * s).sinh() / theta_s.sinh();
                let bottom = (theta_s * (s + 0.5)).tanh() / (2.0 * (0.5 * theta_s).tanh()) - 0.5;
                (1.0 - theta_b) * surface + theta_b * bottom
            }
            Vstretching::Shchepetkin => {
                let c = if theta_s > 0.0 {
                    (1.0 - (theta_s * s).cosh()) / (theta_s.cosh() - 1.0)
                } else {
                    -s * s
                };
                if theta_b > 0.0 {
                    ((theta_b * c).exp() - 1.0) / (1.0 - (-theta_b).exp())
                } else {
                    c
                }
            }
        }
    }
}

/// s-coordinate values at rho-levels (`w_levels = false`) or w-levels
pub fn s_levels(n: usize, w_levels: bool) -> Vec<f64> {
    let n_f = n as f64;
    if w_levels {
        (0..=n).map(|k| (k as f64 - n_f) / n_f).collect()
    } else {
        (0..n).map(|k| (k as f64 - n_f + 0.5) / n_f).collect()
    }
}

/// Vertical s-coordinate description of a ROMS grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalGrid {
    hc: f64,
    s_rho: Vec<f64>,
    cs_r: Vec<f64>,
    s_w: Option<Vec<f64>>,
    cs_w: Option<Vec<f64>>,
    vtransform: Vtransform,
}

impl VerticalGrid {
    /// Create from rho-level s-coordinates and stretching values, bottom first
    pub fn new(hc: f64, s_rho: Vec<f64>, cs_r: Vec<f64>, vtransform: Vtransform) -> Result<Self> {
        if s_rho.is_empty() {
            return Err(XromsError::InvalidParameter {
                param: "s_rho".to_string(),
                message: "At least one vertical level is required".to_string(),
            });
        }
        if s_rho.len() != cs_r.len() {
            return Err(XromsError::shape_mismatch("Cs_r", &[s_rho.len()], &[cs_r.len()]));
        }
        if !hc.is_finite() || hc < 0.0 {
            return Err(XromsError::InvalidParameter {
                param: "hc".to_string(),
                message: format!("Critical depth must be finite and non-negative, got {}", hc),
            });
        }

        Ok(Self {
            hc,
            s_rho,
            cs_r,
            s_w: None,
            cs_w: None,
            vtransform,
        })
    }

    /// Attach w-level s-coordinates (one more than the rho-levels)
    pub fn with_w_levels(mut self, s_w: Vec<f64>, cs_w: Vec<f64>) -> Result<Self> {
        let expected = self.s_rho.len() + 1;
        if s_w.len() != expected {
            return Err(XromsError::shape_mismatch("s_w", &[expected], &[s_w.len()]));
        }
        if cs_w.len() != expected {
            return Err(XromsError::shape_mismatch("Cs_w", &[expected], &[cs_w.len()]));
        }
        self.s_w = Some(s_w);
        self.cs_w = Some(cs_w);
        Ok(self)
    }

    /// Build the s-coordinates from the stretching parameters of a ROMS run
    pub fn from_stretching(
        n: usize,
        hc: f64,
        theta_s: f64,
        theta_b: f64,
        vtransform: Vtransform,
        vstretching: Vstretching,
    ) -> Result<Self> {
        let s_rho = s_levels(n, false);
        let s_w = s_levels(n, true);
        let cs_r = s_rho.iter().map(|&s| vstretching.curve(s, theta_s, theta_b)).collect();
        let cs_w = s_w.iter().map(|&s| vstretching.curve(s, theta_s, theta_b)).collect();

        Self::new(hc, s_rho, cs_r, vtransform)?.with_w_levels(s_w, cs_w)
    }

    /// Number of rho-levels
    pub fn n_levels(&self) -> usize {
        self.s_rho.len()
    }

    pub fn hc(&self) -> f64 {
        self.hc
    }

    pub fn vtransform(&self) -> Vtransform {
        self.vtransform
    }

    fn z(&self, h: f64, s: f64, c: f64) -> f64 {
        match self.vtransform {
            Vtransform::Original => self.hc * s + (h - self.hc) * c,
            Vtransform::Modern => {
                if self.hc + h == 0.0 {
                    return 0.0;
                }
                h * (self.hc * s + h * c) / (self.hc + h)
            }
        }
    }

    /// z of the rho-levels (negative below the surface), bottom first
    pub fn z_rho(&self, h: f64) -> Vec<f64> {
        self.s_rho
            .iter()
            .zip(&self.cs_r)
            .map(|(&s, &c)| self.z(h, s, c))
            .collect()
    }

    /// z of the w-levels (negative below the surface), bottom first
    pub fn z_w(&self, h: f64) -> Result<Vec<f64>> {
        match (&self.s_w, &self.cs_w) {
            (Some(s_w), Some(cs_w)) => Ok(s_w
                .iter()
                .zip(cs_w)
                .map(|(&s, &c)| self.z(h, s, c))
                .collect()),
            _ => Err(XromsError::DataNotFound {
                message: "Vertical grid has no w-levels".to_string(),
            }),
        }
    }
}
