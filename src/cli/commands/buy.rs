//! Buy command implementation.

use anyhow::Result;
use dashboard_core::format::{format_money, format_number};
use dashboard_sync::UserActions;
use std::path::Path;
use tracing::info;

use crate::cli::{connect, load_settings, BuyArgs};

pub async fn run(args: BuyArgs, config_path: &Path) -> Result<()> {
    let config = load_settings(config_path)?;
    let service = connect(&config)?;
    let actions = UserActions::new(service.clone());

    let cash = service.fetch_account_info().await?;
    info!(cash = %cash, "Available cash");

    let ticket = actions.prepare_buy(&args.symbol, args.amount, Some(cash)).await?;
    println!(
        "Buying {} {} at ${} (total {}, cash {})",
        ticket.amount,
        ticket.symbol,
        format_number(ticket.ask_price),
        format_money(Some(ticket.total)),
        format_money(Some(cash)),
    );

    let receipt = actions.buy(&ticket).await?;
    println!("{}: {}", receipt.status, receipt.message);
    Ok(())
}
