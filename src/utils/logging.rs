use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use crate::core::constants::LOG_FILTER_ENV;

const DEFAULT_FILTER: &str = "perch=debug";

/// Install a tracing subscriber that appends to `log_file`.
///
/// Without a log file nothing is installed: the terminal belongs to the
/// annotation UI and anything written to stderr would corrupt the frame.
pub fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = open_log_file(path)?;
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    let subscriber = Registry::default()
        .with(build_env_filter(std::env::var(LOG_FILTER_ENV).ok().as_deref()))
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Logging enabled to: {}", path.display());
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    // Fail early on unwritable paths rather than losing every later line.
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(file)
}

fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
