//! Tracing setup for the command-line tool.
//!
//! Stdout is reserved for the JSON listing output, so human-readable logs go
//! to stderr. An optional log directory adds a daily-rotated JSON log file
//! written through a background, non-blocking writer.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix for the rotated JSON log
pub const LOG_FILE_NAME: &str = "booth-search.json.log";

/// Initialize the global tracing subscriber.
///
/// # Arguments
/// * `log_dir` - When set, also write structured JSON logs to
///   `<log_dir>/booth-search.json.log.<date>`
///
/// # Environment Variables
/// * `RUST_LOG` - Controls log level filtering (default: "info")
///   Examples:
///   - `RUST_LOG=debug` - Show all debug and above
///   - `RUST_LOG=booth_search=trace,reqwest=warn` - Trace for this crate, warn for reqwest
///
/// # Returns
/// The file writer's guard when a log directory is used. Keep it alive until
/// exit or buffered lines are lost.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(build_env_filter()?);

    let Some(log_path) = log_dir else {
        tracing_subscriber::registry().with(stderr_layer).try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(log_path)?;
    let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_NAME);
    let (json_writer, guard) = tracing_appender::non_blocking(file_appender);

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_target(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(build_env_filter()?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init()?;

    tracing::debug!("JSON logs: {}/{}", log_path.display(), LOG_FILE_NAME);

    Ok(Some(guard))
}

/// `RUST_LOG` when set, otherwise "info"
fn build_env_filter() -> Result<EnvFilter, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    Ok(filter)
}
