//! Log setup.
//!
//! The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "SKYCAST_LOG";

/// Install a file-backed subscriber.
///
/// Returns `false` when the log file cannot be opened; the app then runs
/// without logging.
pub fn init(path: Option<&Path>, default_level: &str) -> bool {
    let Some(file) = path.and_then(open_log_file) else {
        return false;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .is_ok()
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
