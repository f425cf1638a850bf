//! Logging setup
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the embedding application. This helper covers the common case.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber built from `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    }
    installed
}
