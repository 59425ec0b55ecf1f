//! Watch command: live polling with periodic status reports.

use anyhow::Result;
use chrono::Local;
use dashboard_monitor::render_status;
use dashboard_sync::{Dashboard, PollCadence};
use std::path::Path;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::cli::{connect, load_settings, WatchArgs};

pub async fn run(args: WatchArgs, config_path: &Path) -> Result<()> {
    let config = load_settings(config_path)?;
    let service = connect(&config)?;
    info!(service = %service.name(), base_url = %config.service.base_url, "Connecting");

    let cadence = PollCadence {
        cash: config.polling.cash_interval(),
        profit: config.polling.profit_interval(),
        trades: config.polling.trades_interval(),
    };
    let dashboard = Dashboard::new(service, cadence);

    let failures = dashboard.load_initial().await;
    if failures > 0 {
        warn!(failures, "Some data could not be loaded; it will be retried on the next refresh");
    }
    println!("{}", render_status(&dashboard.snapshot(), Local::now(), args.rows));

    if args.once {
        return Ok(());
    }

    let mut scheduler = dashboard.start();
    let mut report = interval(cadence.profit.min(cadence.trades));
    report.set_missed_tick_behavior(MissedTickBehavior::Skip);
    report.tick().await;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                break;
            }
            _ = report.tick() => {
                println!("{}", render_status(&dashboard.snapshot(), Local::now(), args.rows));
            }
        }
    }

    scheduler.stop();
    info!("Dashboard stopped");
    Ok(())
}
