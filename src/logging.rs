// src/logging.rs
// =============================================================================
// Diagnostic logging with `tracing`.
//
// User-facing progress goes to stdout with println!. This is the other
// channel: request URLs, config paths, failure details. It is written to
// stderr and is quiet unless RUST_LOG asks for more, e.g.
//
//   RUST_LOG=figma_json=debug figma-json <URL>
// =============================================================================

use tracing_subscriber::EnvFilter;

// Only warnings (e.g. an unreadable config file) show up by default
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Call once, before anything logs.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
