//! Logging setup
//!
//! The library only emits `tracing` events. Hosts that have no subscriber
//! of their own (C callers, the CLI) install one here.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize tracing with the `info` default filter.
pub fn init() {
    init_with_filter("info");
}

/// Initialize tracing with a custom default filter. `RUST_LOG` takes
/// precedence when set. Only the first call has any effect, and an
/// already-installed global subscriber is left in place.
pub fn init_with_filter(default_filter: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init();
    });
}
