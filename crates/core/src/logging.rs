//! Structured logging infrastructure for Sortie.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor config supplies one.
pub const DEFAULT_LEVEL: &str = "info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use sortie_core::logging;
///
/// logging::init();
/// tracing::info!("Coordinator started");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_LEVEL))
        .with(fmt::layer().with_target(true))
        .init();
}

/// Initialize the logging system with JSON output for log aggregation.
///
/// # Example
/// ```no_run
/// use sortie_core::logging;
///
/// logging::init_json();
/// tracing::info!(pass = 1, "Detection pass finished");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_LEVEL))
        .with(fmt::layer().json().with_target(true))
        .init();
}

/// Initialize logging from a [`LoggingConfig`].
///
/// `RUST_LOG` still wins over the configured level. Output goes to stderr so
/// command output on stdout stays machine-readable. Calling this twice is a
/// no-op rather than a panic.
pub fn init_from_config(config: &LoggingConfig) {
    let filter = env_filter(&config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("logging already initialised");
    }
}
