//! `hemsreach`: which airports can a HEMS helicopter reach on the fuel it
//! carries.

use clap::Parser;
use hems_cli::{commands, logging, Cli, Config};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json)?;

    let config = Config::from_env();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(cli, &config, &mut out).await?;
    out.flush()?;
    Ok(())
}
