//! edithost - Registry-driven extensibility host
//!
//! Main entry point for the edithost CLI.

mod cli;
mod cmd_dispatch;
mod cmd_registries;
mod cmd_view_config;
mod host;
mod logging;

use clap::Parser;
use tracing::info;

use edithost_config::ConfigLoader;

use cli::{Cli, Commands};
use host::Host;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, source) = ConfigLoader::discover(cli.config.as_deref())?;
    logging::init_tracing(&config.logging)?;
    match &source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    host::validate(&config)?;

    let host = Host::bootstrap(config)?;

    match cli.command {
        Commands::Registries { format } => cmd_registries::registries(&host, format),
        Commands::Dispatch { input, state } => {
            cmd_dispatch::dispatch(&host, &input, state.as_deref()).await
        }
        Commands::ViewConfig { view, node } => cmd_view_config::view_config(&view, &node),
    }
}
