//! Configuration management for the xroms command-line tool.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path as FsPath, PathBuf};

use crate::error::{Result, XromsError};
use crate::interpolation::INTERPOLATION_METHODS;
use crate::lonlat::{self, LonLat};
use crate::section::{OutOfDomainPolicy, SectionOptions};

/// Command-line arguments for xroms
#[derive(Parser, Debug)]
#[command(name = "xroms")]
#[command(author, version, about = "Extract sections from ROMS output", long_about = None)]
pub struct Args {
    /// Path to the ROMS NetCDF file
    pub netcdf_file: PathBuf,

    /// Variable to extract
    #[arg(short = 'v', long = "var")]
    pub variable: String,

    /// Section path as "lon,lat;lon,lat;..."
    #[arg(short = 'P', long)]
    pub path: String,

    /// Resample a two-point path into this many evenly spaced stations
    #[arg(short = 'n', long)]
    pub points: Option<usize>,

    /// Maximum distance in metres between consecutive stations
    #[arg(long)]
    pub max_step: Option<f64>,

    /// Handling of stations outside the grid (propagate, clip, skip)
    #[arg(long, env = "XROMS_POLICY")]
    pub policy: Option<String>,

    /// Interpolation method (nearest, bilinear)
    #[arg(short, long, env = "XROMS_INTERPOLATION")]
    pub interpolation: Option<String>,

    /// Time index to read from the file
    #[arg(short, long, env = "XROMS_TIME_INDEX")]
    pub time_index: Option<usize>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "XROMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "XROMS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Section extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Out-of-domain handling
    #[serde(default)]
    pub policy: OutOfDomainPolicy,

    /// Default interpolation method
    #[serde(default = "default_interpolation")]
    pub interpolation_method: String,

    /// Value written where all neighbours are land (None = NaN)
    #[serde(default)]
    pub land_value: Option<f64>,
}

/// Data loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Time index read from files with a time dimension
    #[serde(default)]
    pub time_index: usize,

    /// Path to the NetCDF file
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Section configuration
    #[serde(default)]
    pub section: SectionConfig,

    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// What to extract, taken from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRequest {
    pub file: PathBuf,
    pub variable: String,
    pub points: Vec<LonLat>,
    pub n_points: Option<usize>,
    pub max_step: Option<f64>,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, SectionRequest)> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, SectionRequest)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(policy) = &args.policy {
            config.section.policy = policy.parse()?;
        }
        if let Some(method) = args.interpolation {
            config.section.interpolation_method = method;
        }
        if let Some(time_index) = args.time_index {
            config.data.time_index = time_index;
        }
        config.log_level = args.log_level;
        config.data.file_path = Some(args.netcdf_file.clone());

        let request = SectionRequest {
            file: args.netcdf_file,
            variable: args.variable,
            points: lonlat::parse_points(&args.path)?,
            n_points: args.points,
            max_step: args.max_step,
        };

        Ok((config, request))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &FsPath) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.section = other.section;
        self.data.time_index = other.data.time_index;
        if other.data.file_path.is_some() {
            self.data.file_path = other.data.file_path;
        }
        self.log_level = other.log_level;
    }

    /// Section options derived from this configuration
    pub fn section_options(&self) -> SectionOptions {
        SectionOptions {
            policy: self.section.policy,
            interpolation: self.section.interpolation_method.clone(),
            land_value: self.section.land_value.unwrap_or(f64::NAN),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(XromsError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Validate interpolation method
        let method = self.section.interpolation_method.to_lowercase();
        if !INTERPOLATION_METHODS.contains(&method.as_str()) {
            return Err(XromsError::Config {
                message: format!(
                    "Invalid interpolation method: {}. Must be one of: {}",
                    self.section.interpolation_method,
                    INTERPOLATION_METHODS.join(", ")
                ),
            });
        }

        if let Some(land_value) = self.section.land_value {
            if land_value.is_infinite() {
                return Err(XromsError::Config {
                    message: "Land value cannot be infinite".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            section: SectionConfig::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            policy: OutOfDomainPolicy::default(),
            interpolation_method: default_interpolation(),
            land_value: None,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            time_index: 0,
            file_path: None,
        }
    }
}

// Default value functions for serde
fn default_interpolation() -> String {
    "bilinear".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
