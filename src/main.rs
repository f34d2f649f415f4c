// Main entry point for edictscope

use anyhow::Result;
use clap::Parser;
use tracing::info;

use edictscope::cli::{Cli, Commands};
use edictscope::commands::{handle_check, handle_inspect, handle_tree};
use edictscope::config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = config::Config::load().unwrap_or_default();

    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        "edictscope=debug,warn"
    } else {
        "edictscope=warn,error"
    };

    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .event_format(edictscope::logging::CustomFormatter)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if cli.verbose {
        info!("Starting edictscope v{}", env!("CARGO_PKG_VERSION"));
    }

    // Handle init_config flag
    if let Some(config_file) = cli.init_config {
        let defaults = config::Config::default();
        std::fs::write(&config_file, defaults.to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        return Ok(());
    }

    match &cli.command {
        Commands::Check(args) => handle_check(args, &config).await,
        Commands::Inspect(args) => handle_inspect(args).await,
        Commands::Tree(args) => handle_tree(args, &config).await,
    }
}
