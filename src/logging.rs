//! Tracing setup for the binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "FINTRACK_LOG";

/// Directives used when `FINTRACK_LOG` is unset or unreadable
pub const DEFAULT_FILTER: &str = "fintrack=warn";

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber; later calls are no-ops
///
/// Events go to stderr so that table and JSON output on stdout stays
/// machine-readable.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed by an embedding application wins
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
