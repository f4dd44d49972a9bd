//! Command implementations

mod catalogs;
mod config;
mod query;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = config_loader::load_for_cli(&cli)?;
    tracing::debug!(
        server = %config.server.value,
        timeout = config.timeout.value,
        row_limit = config.row_limit.value,
        "Loaded configuration"
    );

    match cli.command {
        Commands::Query(args) => query::execute(args, &config, &output),
        Commands::Catalogs(args) => catalogs::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
