//! Logging setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a `fmt` subscriber filtered by `filter` (e.g. `"info"` or
/// `"chirpy_session=debug,info"`).
///
/// `RUST_LOG`, when set and valid, takes precedence over `filter`. An
/// invalid `filter` falls back to `info`. Calling this again after a
/// subscriber is installed does nothing, so tests may call it freely.
pub fn init_tracing(filter: &str) {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .or_else(|| EnvFilter::try_new(filter).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init();
}
