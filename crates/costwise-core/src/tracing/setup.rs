//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the costwise tracing/logging system.
///
/// Reads the `COSTWISE_LOG` environment variable for per-subsystem log
/// levels, e.g. `COSTWISE_LOG=pricing=debug,pipeline=info`.
///
/// Falls back to `costwise=info` if `COSTWISE_LOG` is not set or invalid.
///
/// Idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("COSTWISE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("costwise=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
