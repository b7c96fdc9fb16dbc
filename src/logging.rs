use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Daily rotated file writer under `dir`. Buffered lines are written when the
/// returned guard is dropped.
pub fn file_writer(dir: impl AsRef<Path>) -> (NonBlocking, WorkerGuard) {
    let file_appender = tracing_appender::rolling::daily(dir, "price_index.log");
    tracing_appender::non_blocking(file_appender)
}

/// Initializes the logging system with both console and file output.
///
/// Hold the returned guard until the process exits, including error exits,
/// or the tail of the file log is lost.
pub fn init_logging() -> WorkerGuard {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    let (non_blocking_writer, guard) = file_writer("logs");
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Console goes to stderr so `--json` output on stdout stays machine readable
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("price_index=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
