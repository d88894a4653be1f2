//! Diagnostic logging for the `checkin` binary.
//!
//! Two outputs share one `tracing` registry:
//! - stderr, warnings and errors only unless `verbose` is set
//! - a plain-text diagnostic file capturing everything the filter allows
//!   (debug level by default), rewritten on every run

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::error::{CheckinError, Result};

/// Maps common level spellings (`WARNING`, `CRITICAL`, ...) to `tracing`
/// filter directives. Anything else is passed through unchanged.
pub fn normalize_level(level: &str) -> String {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => "trace".to_string(),
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARN" | "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => level.trim().to_string(),
    }
}

/// Builds the file filter: explicit level, then `RUST_LOG`, then `debug`.
fn file_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::try_new(normalize_level(level))
            .unwrap_or_else(|_| EnvFilter::new("debug")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// # Errors
///
/// [`CheckinError::Io`] if the diagnostic file cannot be created, and
/// [`CheckinError::Configuration`] if a global subscriber is already set.
pub fn setup_logging(log_file: &Path, log_level: Option<&str>, verbose: bool) -> Result<()> {
    let file = File::create(log_file)?;

    let stderr_level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_level);

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(file_filter(log_level));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CheckinError::configuration("log_level", e.to_string()))
}
