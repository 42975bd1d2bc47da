//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,lorecraft=debug";

/// Install a formatted subscriber for the whole process.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_FILTER`]. Calling this more
/// than once is harmless, later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
