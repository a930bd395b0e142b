#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature this module re-exports the `tracing` macros so
//! downstream crates can log through `keyline_core::logging` without naming
//! the dependency. `tracing-json` adds a JSON subscriber for production
//! hosts. Without either feature the module is empty and logging compiles
//! away.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, trace_span, warn};

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "KEYLINE_LOG";

/// Install a JSON `tracing` subscriber on stderr.
///
/// The filter comes from `KEYLINE_LOG` and falls back to `default_filter`.
/// Returns `false` when a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
