//! Log setup for the exporter binary.
//!
//! Per-collection problems are reported as `warn!` events on stderr;
//! progress and the final summary stay on stdout.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map `-v`/`-q` flags to a maximum level.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Initialize the global subscriber. `RUST_LOG` wins over the flags when set.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = LevelFilter::from_level(level_for(verbose, quiet));
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
