//! File-backed tracing setup.
//!
//! The terminal belongs to the UI for the whole session, so diagnostics go to
//! `<config dir>/hourglass.log` instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HOURGLASS_LOG";

pub fn init(log_file: &Path) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_file) else {
        // No sink available; tracing macros stay no-ops.
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();

    // Panic messages would otherwise be printed over the alternate screen.
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}
