//! Diagnostic logging on stderr.
//!
//! Library code only emits `tracing` events; the binary installs the
//! subscriber once. `RUST_LOG` takes precedence over the `-v` flag.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "propkeep=debug,warn" } else { "warn" }
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
