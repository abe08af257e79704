//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; `RUST_LOG` overrides the
//! configured level when set.

use crate::config::LogLevel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The filter for `level`, unless `RUST_LOG` provides one.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Install the stderr subscriber.
///
/// Returns `false` when a global subscriber was already installed, which
/// happens when the library is driven more than once in a process.
pub fn init(level: LogLevel) -> bool {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry().with(env_filter(level)).with(console_layer).try_init().is_ok()
}
