//! Validate configuration command.

use anyhow::Result;
use dashboard_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Invalid setting: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {} ({})", config.app.name, config.app.environment);
    println!("Logging: {} ({})", config.logging.level, config.logging.format);
    println!("Service: {}", config.service.base_url);
    println!("Request timeout: {}s", config.service.request_timeout_secs);
    println!(
        "Polling: cash {}s, profit {}s, trades {}s",
        config.polling.cash_interval_secs,
        config.polling.profit_interval_secs,
        config.polling.trades_interval_secs
    );

    Ok(())
}
