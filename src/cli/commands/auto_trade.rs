//! Auto-trade command implementation.

use anyhow::Result;
use dashboard_core::{SessionPhase, SessionRequest};
use dashboard_sync::{read_view, AutoTradeController, DashboardViewModel};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::time::interval;
use tracing::warn;

use crate::cli::{connect, load_settings, AutoTradeArgs};

pub async fn run(args: AutoTradeArgs, config_path: &Path) -> Result<()> {
    let request = SessionRequest::new(args.duration, args.unit, args.symbols);
    let symbols = request.validate()?;

    let config = load_settings(config_path)?;
    let view = DashboardViewModel::shared();
    let mut controller = AutoTradeController::new(connect(&config)?, view.clone());

    controller.toggle(&request).await?;
    println!(
        "Auto-trading {} for {} {} (Ctrl-C to stop)",
        symbols.join(", "),
        request.duration,
        request.unit
    );

    let mut display = interval(Duration::from_secs(1));
    let interrupted = loop {
        tokio::select! {
            _ = controller.finished() => break false,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                break true;
            }
            _ = display.tick() => {
                if let Some(countdown) = read_view(&view).session.countdown() {
                    print!("\r  {} remaining ", countdown);
                    let _ = std::io::stdout().flush();
                }
            }
        }
    };
    println!();

    if !interrupted || controller.phase() != SessionPhase::Running {
        println!("Auto-trade session finished.");
        return Ok(());
    }

    match controller.toggle(&request).await {
        Ok(_) => {
            println!("Auto-trade session stopped.");
            Ok(())
        }
        Err(fault) => {
            println!("Stopped locally, but the service did not confirm: {}", fault);
            Err(fault.into())
        }
    }
}
