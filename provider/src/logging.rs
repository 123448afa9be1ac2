//! Logging setup for the provider and its tools.
//!
//! All logs go to **stderr**; stdout stays free for the host process.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: controls log levels (e.g. `info`, `netdata_core=debug`)
//!
//! ```bash
//! # Show every request the client sends
//! RUST_LOG=netdata_core=debug,info netdata-sweeper --space-id <id>
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::ProviderError;

/// Install the default subscriber, filtered by `RUST_LOG` or `info`.
pub fn init_logging() -> Result<(), ProviderError> {
    init_logging_with_default("info")
}

/// Like [`init_logging`] with a custom fallback level.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_default(default_level: &str) -> Result<(), ProviderError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .map_err(|e| ProviderError::Configuration(format!("logging: {e}")))
}
