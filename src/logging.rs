use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::canvas::settings::CanvasSettings;

/// Initialise logging with the level taken from `debug_logging`.
pub fn init_from_settings(settings: &CanvasSettings, log_file: Option<PathBuf>) {
    init(settings.debug_logging, log_file);
}

/// Initialise logging. `debug` raises the level to `debug` and lets `RUST_LOG`
/// override it; otherwise the level is fixed at `info`. When `log_file` is set
/// output goes to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let Some(file_name) = path.file_name() else {
                return;
            };
            let appender = tracing_appender::rolling::never(dir, file_name);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(appender)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
}
