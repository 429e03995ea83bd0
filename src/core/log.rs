use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a `tracing` filter directive, e.g. `DYNIMPORT_LOG=dynimport=debug`.
/// `RUST_LOG` is consulted when it is unset.
pub const LOG_ENV_VAR: &str = "DYNIMPORT_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a stderr `fmt` subscriber. Safe to call multiple times; only the first call has an
/// effect. `default_directive` is used when neither environment variable is set.
pub fn init_tracing(default_directive: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // Another subscriber may already be installed by an embedding application.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .try_init();
    });
}
