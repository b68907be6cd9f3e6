// SPDX-License-Identifier: Apache-2.0

//! discover - insights about a GitHub repository.
//!
//! Lists who engaged with a set of issues and pull requests (authors,
//! commenters, reaction givers) so they can be updated on progress.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;
mod provider;
mod shutdown;

use anyhow::{Context, Result};
use clap::Parser;
use discover_core::config;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet, cli.verbose);

    let config = config::load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    match commands::run(cli.command, output_ctx, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            std::process::exit(1);
        }
    }
}
