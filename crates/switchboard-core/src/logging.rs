//! Tracing subscriber initialization.
//!
//! One-shot setup shared by binaries and integration tests. The
//! `SWITCHBOARD_LOG` environment variable overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `default_filter` is used when `SWITCHBOARD_LOG` is unset, e.g.
/// `"switchboard=info"`. Calling this more than once is a no-op; the
/// second call's filter is ignored.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_env("SWITCHBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
