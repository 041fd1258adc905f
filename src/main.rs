//! xroms - Extract sections from ROMS output
//!
//! This is the main entry point for the xroms command-line tool. The section
//! is written to stdout as JSON; logs go to stderr.

use anyhow::Context;
use std::io::Write;
use std::time::Instant;
use tracing::{error, info};

use xroms::data_loader::load_roms_file;
use xroms::{
    init_tracing, log_error, log_operation_end, log_operation_start, log_section_stats,
    log_timed_operation, Config, Path, SectionExtractor,
};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let (config, request) = Config::load().context("Configuration error")?;

    // Validate configuration
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log_level);
    info!("Starting xroms v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading NetCDF file: {:?}", request.file);

    let load_start = Instant::now();
    let file_name = request.file.display().to_string();
    log_operation_start("load_roms_file", Some(&file_name));
    let dataset = load_roms_file(&request.file, config.data.time_index).map_err(|e| {
        log_error(&e, "loading ROMS file");
        e
    })?;
    log_operation_end("load_roms_file", load_start, !dataset.fields().is_empty());

    let field = dataset.field(&request.variable).map_err(|e| {
        error!(available = ?dataset.fields().names(), "Unknown variable {}", request.variable);
        e
    })?;

    // Build the section path
    let mut path = match (request.n_points, request.points.as_slice()) {
        (Some(n), [start, end]) => Path::straight(*start, *end, n)?,
        (Some(_), points) => {
            anyhow::bail!(
                "--points resamples a two-point path, got {} points",
                points.len()
            )
        }
        (None, _) => Path::new(request.points.clone())?,
    };
    if let Some(max_step) = request.max_step {
        path = path.densify(max_step)?;
    }
    info!(
        stations = path.len(),
        policy = %config.section.policy,
        interpolation = %config.section.interpolation_method,
        "Extracting section of {}",
        request.variable
    );

    let extractor = SectionExtractor::new(dataset.grid(), config.section_options())?;
    let section = log_timed_operation("extract_section", || extractor.extract(&path, field))
        .map_err(|e| {
            log_error(&e, "extracting section");
            e
        })?;
    log_section_stats(&section);

    let json = serde_json::to_string_pretty(&section)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;

    Ok(())
}
