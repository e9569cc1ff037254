//! Logging setup for the binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the filter is `warn`, or `debug`
/// with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
