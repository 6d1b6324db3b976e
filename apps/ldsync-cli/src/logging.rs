//! Verbosity-driven tracing setup.

use tracing_subscriber::EnvFilter;

/// Initialize logging from the repeated `-v` count.
///
/// `LDSYNC_LOG` overrides the flag-derived filter when set, using the
/// usual env-filter syntax. Diagnostics go to stderr so dry-run
/// output on stdout stays clean.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_env("LDSYNC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
