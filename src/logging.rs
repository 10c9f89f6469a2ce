//! Logging setup: a log file for every run, console output on request

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::{Error, Result};

pub const LOG_FILE_NAME: &str = "factorio_calculator.log";

/// Install the global subscriber and return the log file path.
///
/// The file receives everything at `debug` and above (or whatever `RUST_LOG`
/// asks for). With `console` set, `info` and above are mirrored to stdout.
pub fn init(log_dir: &Path, console: bool) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_file = log_dir.join(LOG_FILE_NAME);
    let file = File::options().create(true).append(true).open(&log_file)?;

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .with_filter(file_filter);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stdout)
            .with_filter(LevelFilter::INFO)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    info!("logger initialized");
    if console {
        info!("console logging enabled");
    }
    debug!(path = %log_file.display(), "log file");
    Ok(log_file)
}
