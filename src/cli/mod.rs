//! CLI definitions.

pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_client::{HttpTradingClient, ServiceConfig};
use dashboard_config::{load_config, AppConfig, LoggingConfig};
use dashboard_core::{ChartInterval, ChartSpan, DurationUnit, PriceField, TradingService};
use dashboard_monitor::LogFormat;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "crypto-dashboard")]
#[command(author, version, about = "Crypto trading account dashboard")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides `[logging] level`)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format (overrides `[logging] format`)
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the account and print a status report on every refresh
    Watch(WatchArgs),
    /// List tradeable symbols
    Cryptos,
    /// Print the current ask price of a symbol
    Quote(QuoteArgs),
    /// Buy a symbol with available cash
    Buy(BuyArgs),
    /// Run a bounded auto-trading session
    AutoTrade(AutoTradeArgs),
    /// Fetch a historical price chart
    Chart(ChartArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Load once, print one report and exit
    #[arg(long)]
    pub once: bool,

    /// Trade rows shown per report
    #[arg(long, default_value = "20")]
    pub rows: usize,
}

#[derive(clap::Args)]
pub struct QuoteArgs {
    pub symbol: String,
}

#[derive(clap::Args)]
pub struct BuyArgs {
    pub symbol: String,

    /// Number of coins
    pub amount: Decimal,
}

#[derive(clap::Args)]
pub struct AutoTradeArgs {
    /// Session length
    #[arg(short, long)]
    pub duration: u64,

    /// Unit of the duration (seconds, minutes, hours)
    #[arg(short, long, default_value = "seconds")]
    pub unit: DurationUnit,

    /// Symbols to trade (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,
}

#[derive(clap::Args)]
pub struct ChartArgs {
    pub symbol: String,

    /// Spacing between points (15second, 5minute, 10minute, hour, day, week)
    #[arg(short, long)]
    pub interval: ChartInterval,

    /// Time covered (hour, day, week, month, 3month, year, 5year)
    #[arg(short, long)]
    pub span: ChartSpan,

    /// Price series (comma-separated: high, low, open, close)
    #[arg(short, long, value_delimiter = ',', default_value = "close")]
    pub fields: Vec<PriceField>,

    /// Write the chart image to an HTML file
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Ask for commentary on the chart
    #[arg(long)]
    pub ask_ai: bool,
}

/// Log level and format: command-line flags first, then `[logging]`.
pub fn resolve_logging(cli: &Cli, logging: &LoggingConfig) -> Result<(String, LogFormat)> {
    let level = match cli.log_level {
        Some(level) => level.as_str().to_string(),
        None => logging.level.clone(),
    };
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        logging.format.parse::<LogFormat>().map_err(anyhow::Error::msg)?
    };
    Ok((level, format))
}

/// Load and validate the configuration file.
pub fn load_settings(path: &Path) -> Result<AppConfig> {
    let config = load_config(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Build the remote service client from configuration.
pub fn connect(config: &AppConfig) -> Result<Arc<dyn TradingService>> {
    let client = HttpTradingClient::new(ServiceConfig::new(
        config.service.base_url.clone(),
        config.service.request_timeout(),
    ))?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["crypto-dashboard"];
        argv.extend_from_slice(args);
        argv.push("cryptos");
        Cli::parse_from(argv)
    }

    fn logging(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_logging_comes_from_config() {
        let (level, format) = resolve_logging(&parse(&[]), &logging("debug", "json")).unwrap();
        assert_eq!(level, "debug");
        assert_eq!(format, LogFormat::Json);
    }

    #[test]
    fn test_flags_override_logging_config() {
        let cli = parse(&["--log-level", "warn", "--json-logs"]);
        let (level, format) = resolve_logging(&cli, &logging("debug", "pretty")).unwrap();
        assert_eq!(level, "warn");
        assert_eq!(format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_log_format_is_an_error() {
        assert!(resolve_logging(&parse(&[]), &logging("info", "xml")).is_err());
        assert!(resolve_logging(&parse(&["--json-logs"]), &logging("info", "xml")).is_ok());
    }
}
