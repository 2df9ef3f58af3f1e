use std::env;
use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

const LOG_ENV: &str = "GITCAL_LOG";

/// Install the stderr subscriber.
///
/// `GITCAL_LOG` wins over `RUST_LOG`; without either the level is `info`,
/// or `debug` when `-v` was given.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = build_filter(verbosity).context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbosity > 1)
        .without_time()
        .try_init()
        .map_err(|err| anyhow::anyhow!("Could not install the logger: {err}"))
}

fn build_filter(verbosity: u8) -> Result<EnvFilter, ParseError> {
    if let Ok(spec) = env::var(LOG_ENV) {
        if !spec.trim().is_empty() {
            return EnvFilter::try_new(spec);
        }
    }

    let default = match verbosity {
        0 => "info",
        1 => "info,gitcal=debug,gitcal_core=debug",
        _ => "debug",
    };

    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) if !spec.trim().is_empty() && verbosity == 0 => EnvFilter::try_new(spec),
        _ => EnvFilter::try_new(default),
    }
}
