//! Logging infrastructure for Gaindalf.
//!
//! Provides centralized tracing setup for the CLI and tests.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn stderr_subscriber(default_level: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
}

/// Run `f` with INFO logging to stderr before the global subscriber exists
///
/// Used while loading the config that decides the real log level.
pub fn bootstrap<T>(f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(stderr_subscriber("info"), f)
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (debug, info, warn, error)
///
/// RUST_LOG still wins when set. Output goes to stderr so command
/// output on stdout stays clean.
pub fn init_with_level(default_level: &str) {
    let _ = stderr_subscriber(default_level).try_init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
