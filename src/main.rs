//! Crypto dashboard CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use dashboard_config::load_config;
use dashboard_monitor::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing or broken file is reported by the command itself
    let logging = load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_default();
    let (level, format) = cli::resolve_logging(&cli, &logging)?;
    setup_logging(&level, format);

    match cli.command {
        Commands::Watch(args) => cli::commands::watch::run(args, &cli.config).await,
        Commands::Cryptos => cli::commands::cryptos::run(&cli.config).await,
        Commands::Quote(args) => cli::commands::quote::run(args, &cli.config).await,
        Commands::Buy(args) => cli::commands::buy::run(args, &cli.config).await,
        Commands::AutoTrade(args) => cli::commands::auto_trade::run(args, &cli.config).await,
        Commands::Chart(args) => cli::commands::chart::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
