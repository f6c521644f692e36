//! Logging setup: console plus an optional plain-text log file.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_DIR: &str = "data/logs";
pub const LOG_FILE: &str = "clickloop.log";

/// Initialize logging.
///
/// `RUST_LOG` wins over `verbose`. If the log directory cannot be created,
/// logging continues on the console only.
pub fn setup(verbose: bool, log_file: bool) {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter(verbose));

    let file_layer = if log_file {
        let log_dir = Path::new(LOG_DIR);
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, LOG_FILE);
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .with_filter(filter(verbose)),
            )
        }
    } else {
        None
    };

    let file_enabled = file_layer.is_some();
    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    if file_enabled {
        tracing::debug!("File logging enabled: {}/{}", LOG_DIR, LOG_FILE);
    }
}

fn filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
