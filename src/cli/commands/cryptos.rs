//! List tradeable symbols.

use anyhow::Result;
use std::path::Path;

use crate::cli::{connect, load_settings};

pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_settings(config_path)?;
    let service = connect(&config)?;

    let catalog = service.fetch_catalog().await?;
    if catalog.is_empty() {
        println!("No tradeable symbols.");
        return Ok(());
    }

    println!("Tradeable symbols ({}):", catalog.len());
    for symbol in &catalog {
        println!("  {}", symbol);
    }
    Ok(())
}
