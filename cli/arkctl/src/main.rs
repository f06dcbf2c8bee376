//! arkctl (ark) - command-line resolver for ARK identifiers
//!
//! Parses, validates, resolves, and mints ARK identifiers against a local
//! project registry. Configuration comes from flags and `ARK_*` variables.

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod error;
mod logging;
mod output;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level(), cli.log_format());

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
