//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays clean for share content and JSON.
//! `RUST_LOG` wins when set; otherwise the level follows `--verbose` and
//! `--quiet`. The reaper daemon logs its sweeps at info by default.

use tracing_subscriber::{fmt, EnvFilter};

fn default_directive(verbose: bool, quiet: bool, daemon: bool) -> &'static str {
    if verbose {
        "mediashare=debug,mediashare_core=debug,warn"
    } else if quiet {
        "error"
    } else if daemon {
        "mediashare=info,mediashare_core=info,warn"
    } else {
        "warn"
    }
}

pub fn init_logging(verbose: bool, quiet: bool, daemon: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet, daemon)));

    // A second init (only possible in tests) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
