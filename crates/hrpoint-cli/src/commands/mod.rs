//! Command implementations

mod add;
mod config;
mod export;
mod init;
mod near;
mod nearby;
mod truncate;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use crate::workspace::{load_config, Workspace};
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    if let Commands::Config = cli.command {
        return config::execute(&config, &output);
    }

    let workspace = Workspace::open(&config).await?;
    match cli.command {
        Commands::Init => init::execute(&workspace, &output).await,
        Commands::Add(args) => add::execute(args, &workspace, &output).await,
        Commands::Truncate => truncate::execute(&workspace, &output).await,
        Commands::Near(args) => near::execute(args, &workspace, &output).await,
        Commands::Nearby(args) => nearby::execute(args, &workspace, &output).await,
        Commands::Export(args) => export::execute(args, &workspace, &output).await,
        Commands::Config => Ok(()),
    }
}
