//! Print the current ask price.

use anyhow::Result;
use dashboard_core::format::format_number;
use dashboard_sync::UserActions;
use std::path::Path;

use crate::cli::{connect, load_settings, QuoteArgs};

pub async fn run(args: QuoteArgs, config_path: &Path) -> Result<()> {
    let config = load_settings(config_path)?;
    let actions = UserActions::new(connect(&config)?);

    let price = actions.quote(&args.symbol).await?;
    println!("{} ask: ${}", args.symbol.trim().to_uppercase(), format_number(price));
    Ok(())
}
