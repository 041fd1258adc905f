//! Logging utilities for xroms.
//!
//! This module provides structured logging helpers so that loading and
//! extraction runs leave searchable, timed log records.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::section::SectionResult;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration = start_time.elapsed();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with warnings"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = generate_operation_id();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    let duration = start.elapsed();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = duration.as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log detailed information about a loaded dataset
pub fn log_data_load_stats(
    file_path: &str,
    field_names: &[&str],
    grid_shape: (usize, usize),
    n_levels: Option<usize>,
    memory_usage: usize,
) {
    info!(
        operation = "data_load",
        file_path = file_path,
        field_count = field_names.len(),
        fields = %field_names.join(", "),
        eta_rho = grid_shape.0,
        xi_rho = grid_shape.1,
        s_rho = n_levels.unwrap_or(0),
        memory_mb = memory_usage / (1024 * 1024),
        "Data loaded successfully"
    );
}

/// Log a summary of an extracted section
pub fn log_section_stats(section: &SectionResult) {
    let clipped = section.stations().iter().filter(|s| s.clipped).count();
    let length_km = section
        .stations()
        .last()
        .map(|s| s.distance / 1000.0)
        .unwrap_or(0.0);

    info!(
        operation = "section",
        field = section.field(),
        placement = %section.placement(),
        stations = section.stations().len(),
        levels = section.n_levels(),
        clipped = clipped,
        length_km = length_km,
        "Section extracted"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::XromsError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique operation ID
pub fn generate_operation_id() -> String {
    Uuid::new_v4().to_string()
}
