//! Logging setup
//!
//! Diagnostics go to stderr so table output on stdout stays pipeable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "NYD_LOG";

/// Initialize the global subscriber
///
/// The filter comes from `NYD_LOG`, then `RUST_LOG`, then the verbosity flag.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "nyd=debug" } else { "nyd=warn" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // Ignore the error if a subscriber was already installed (tests)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
