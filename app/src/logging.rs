//! Tracing subscriber setup.
//!
//! Logs go to stderr; stdout belongs to the stdio transport.

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, DEFAULT_LOG_FILTER};

/// Build the filter from the configured directive, falling back to `info`
/// when the directive does not parse.
pub fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(config: &AppConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.log_filter))
        .with_writer(std::io::stderr)
        .with_target(config.is_debug_enabled())
        .try_init();
}
