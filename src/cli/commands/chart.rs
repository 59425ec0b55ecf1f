//! Chart command implementation.

use anyhow::{Context, Result};
use dashboard_core::ChartRequest;
use dashboard_monitor::render_chart_summary;
use dashboard_sync::UserActions;
use std::path::Path;
use tracing::info;

use crate::cli::{connect, load_settings, ChartArgs};

pub async fn run(args: ChartArgs, config_path: &Path) -> Result<()> {
    let request = ChartRequest::try_new(
        Some(args.symbol.as_str()),
        Some(args.interval),
        Some(args.span),
        &args.fields,
    )?;

    let config = load_settings(config_path)?;
    let actions = UserActions::new(connect(&config)?);

    let payload = match actions.chart(&request).await {
        Ok(payload) => payload,
        Err(fault) if fault.is_remote_rejection() => {
            println!("{} cannot be charted: {}", request.title(), fault);
            return Err(fault.into());
        }
        Err(fault) => return Err(fault.into()),
    };
    print!("{}", render_chart_summary(&request, &payload));

    if let Some(out) = &args.out {
        let html = format!(
            "<!DOCTYPE html>\n<html><head><title>{title}</title></head>\n<body><h1>{title}</h1>\n<img src=\"{uri}\" alt=\"{title}\"/></body></html>\n",
            title = request.title(),
            uri = payload.data_uri(),
        );
        std::fs::write(out, html)
            .with_context(|| format!("failed to write chart to {}", out.display()))?;
        info!(path = %out.display(), "Chart written");
        println!("Chart written to {}", out.display());
    }

    if args.ask_ai {
        let commentary = actions.ask_ai(&request, &payload).await?;
        println!();
        println!("{}", commentary);
    }

    Ok(())
}
