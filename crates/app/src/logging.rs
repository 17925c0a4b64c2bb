//! Diagnostic logging on stderr.
//!
//! stdout is reserved for `--stats` and `--print-config` output.

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a given number of `-v` flags.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber.
///
/// With no `-v`, `RUST_LOG` is honoured and falls back to `warn`. An explicit
/// `-v` wins over the environment. Calling this twice leaves the first
/// subscriber in place.
pub fn init(verbosity: u8) {
    let filter = if verbosity == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(0)))
    } else {
        EnvFilter::new(level_for(verbosity))
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init();
    if let Err(e) = installed {
        tracing::debug!(error = %e, "keeping the existing subscriber");
    }
}
