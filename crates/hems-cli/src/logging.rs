//! Tracing setup for the binary. Logs go to stderr so stdout carries only
//! tables or JSON.

use anyhow::Result;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` when set, otherwise the crate defaults (`debug` with
/// `verbose`).
pub fn env_filter(verbose: bool) -> Result<EnvFilter> {
    filter_for(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), verbose)
}

fn filter_for(rust_log: Option<&str>, verbose: bool) -> Result<EnvFilter> {
    if let Some(directives) = rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        return Ok(EnvFilter::try_new(directives)?);
    }
    let defaults = if verbose {
        "hems_cli=debug,hems_weather=debug,hems_core=debug"
    } else {
        "hems_cli=info,hems_weather=warn"
    };
    Ok(EnvFilter::try_new(defaults)?)
}

pub fn init(verbose: bool, json: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(verbose)?);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(io::stderr))
            .try_init()?;
    }
    Ok(())
}
