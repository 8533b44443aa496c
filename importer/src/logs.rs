//! Pipeline progress logging.
//!
//! Thin helpers over `tracing` so pipeline stages read as a narrative
//! (`log_info`, `log_success`, ...). Everything goes to stderr; stdout is
//! reserved for the final report.

use tracing_subscriber::EnvFilter;

/// Log level of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

/// Emit one progress line at the given level.
pub fn log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!("{}", message),
        LogLevel::Info => tracing::info!("{}", message),
        LogLevel::Success => tracing::info!(status = "ok", "{}", message),
        LogLevel::Warning => tracing::warn!("{}", message),
        LogLevel::Error => tracing::error!("{}", message),
    }
}

pub fn log_debug(msg: impl Into<String>) {
    log(LogLevel::Debug, &msg.into());
}

pub fn log_info(msg: impl Into<String>) {
    log(LogLevel::Info, &msg.into());
}

pub fn log_success(msg: impl Into<String>) {
    log(LogLevel::Success, &msg.into());
}

pub fn log_warning(msg: impl Into<String>) {
    log(LogLevel::Warning, &msg.into());
}

pub fn log_error(msg: impl Into<String>) {
    log(LogLevel::Error, &msg.into());
}

/// Default filter directive for a verbosity count (`-v`, `-vv`).
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "stockload=info",
        1 => "stockload=debug",
        _ => "stockload=trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the verbosity flag.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
