//! Tracing subscriber setup shared by the command-line binaries.

use tracing_subscriber::EnvFilter;

/// Returns the default filter directive for the given verbosity flags.
///
/// `quiet` wins over `verbose`; `-v` maps to debug and `-vv` or more to trace.
#[must_use]
pub fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > default (info).
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
