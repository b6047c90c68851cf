// Logging setup, powered by tracing-subscriber
//
// Always writes to the log file; stderr only on request. RUST_LOG wins over
// the configured level.

use std::fs;

use color_eyre::eyre::{eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use roster_service::LogConfig;

/// Filter from RUST_LOG if set, otherwise `level` with noisy HTTP crates quieted
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    for target in ["hyper", "hyper_util", "reqwest", "rustls", "h2"] {
        directives.push(format!("{}=warn", target));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| eyre!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines reach the file.
pub fn init_logging(config: &LogConfig, to_stderr: bool) -> Result<WorkerGuard> {
    let path = config.file_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Log file path has no file name: {}", path.display()))?;
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .with_filter(build_env_filter(&config.level)?);

    let stderr_layer = if to_stderr {
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(build_env_filter(&config.level)?),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
