//! Logging setup shared by the binaries

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr `fmt` subscriber; `verbose` switches from `info` to `debug`.
///
/// Stdout stays reserved for command output.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
