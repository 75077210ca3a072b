//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Filter precedence: `SLOWQURAN_LOG`, then `RUST_LOG`, then the config's
//! `log_filter`.

use crate::config::ENV_LOG;
use tracing_subscriber::EnvFilter;

/// Build the filter from the environment, falling back to `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    std::env::var(ENV_LOG)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .or_else(|| EnvFilter::try_new(default_filter).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber. Safe to call twice; the second call is a no-op.
pub fn init(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(false)
        .try_init();
}
