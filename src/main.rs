use anyhow::Result;
use clap::Parser;
use fitaxis::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = fitaxis::config::Config::load(cli.config.clone())?;
    config.validate().map_err(fitaxis_shared::Error::Config)?;

    fitaxis::observability::init_observability("fitaxis", &config.observability)?;

    let result = match cli.command {
        Commands::Recommend(args) => fitaxis::cli::recommend(&config, args),
        Commands::Catalog(args) => fitaxis::cli::catalog(args),
    };

    fitaxis::observability::shutdown_observability();

    result
}
