//! Process-wide `tracing` setup.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Timestamp layout of every log line.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install a stdout subscriber honoring `RUST_LOG`.
///
/// Lines carry a local timestamp and the source `file:line`. Returns `false`
/// when a global subscriber was already installed, which leaves it in place.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .try_init()
        .is_ok()
}
