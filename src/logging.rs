//! Tracing subscriber setup.
//!
//! Logs go to stderr only: stdout carries command output and, for
//! `qrkit-rpc`, the JSON-RPC protocol stream.

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the log filter (falls back to `RUST_LOG`).
pub const LOG_ENV: &str = "QRKIT_LOG";

fn default_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Builds the filter from `QRKIT_LOG`, then `RUST_LOG`, then the build default.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level()))
}

/// Installs the global subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logging() {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
