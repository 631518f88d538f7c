use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,ballgame_tui=debug";
const LOG_FILE: &str = "ballgame-tui.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Logging while the terminal UI owns the screen: a daily rolling file in
/// `log_dir`, or nothing at all. Keep the returned guard alive until exit so
/// buffered lines get flushed.
pub fn init_tui(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let log_dir = log_dir?;

    // rolling::daily panics if it cannot create the file
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: could not create log directory {}: {}", log_dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .try_init();

    Some(guard)
}

/// Logging for one-shot commands: stderr, so stdout stays clean for output.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init();
}
