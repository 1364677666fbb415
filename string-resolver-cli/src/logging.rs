//! Logging initialization.
//!
//! Events go to stderr so stdout stays clean for JSON output. `RUST_LOG`
//! takes precedence over the `-v` count.

use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default filter directive.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
