//! Plain-text rendering of the dashboard view model.

use chrono::{DateTime, Local, Utc};
use dashboard_core::format::{format_money, format_number};
use dashboard_core::{ChartPayload, ChartRequest, PositionMap, SessionPhase, Trade};
use dashboard_sync::DashboardViewModel;
use std::fmt::Write;

/// Full status report: account, session, holdings and recent trades.
pub fn render_status(vm: &DashboardViewModel, now: DateTime<Local>, max_trades: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crypto Dashboard ({}) ===", now.format("%B %-d, %Y %H:%M:%S"));
    let _ = writeln!(out, "Cash:         {}", format_money(vm.account.cash));
    let _ = writeln!(out, "Today's P/L:  {}", format_money(vm.account.profit));
    let _ = writeln!(
        out,
        "Updated:      cash {}  P/L {}  trades {}  positions {}",
        stamp(vm.updated.cash),
        stamp(vm.updated.profit),
        stamp(vm.updated.trades),
        stamp(vm.updated.positions),
    );

    match (vm.session.phase, vm.session.countdown()) {
        (SessionPhase::Running, Some(countdown)) => {
            let _ = writeln!(
                out,
                "Auto-trade:   RUNNING {} [{}]",
                countdown,
                vm.session.symbols.join(", ")
            );
        }
        (phase, _) => {
            let _ = writeln!(out, "Auto-trade:   {}", phase);
        }
    }

    out.push('\n');
    out.push_str(&render_positions(&vm.positions));
    out.push('\n');
    out.push_str(&render_trades(&vm.trades, max_trades));
    out
}

/// Local wall-clock time of a feed's last success.
fn stamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// Holdings table with derived value and gain columns.
pub fn render_positions(positions: &PositionMap) -> String {
    let mut out = String::from("Positions\n");
    if positions.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<8} {:>14} {:>14} {:>14} {:>14}",
        "SYMBOL", "QUANTITY", "PRICE", "VALUE", "GAIN"
    );
    for (symbol, position) in positions {
        let gain = position.unrealized_gain();
        let marker = if position.is_gain() { "+" } else { "" };
        let _ = writeln!(
            out,
            "  {:<8} {:>14} {:>14} {:>14} {:>14}",
            symbol,
            format_number(position.quantity),
            format_number(position.current_price),
            format_number(position.current_value()),
            format!("{}{}", marker, format_number(gain)),
        );
    }
    out
}

/// Trade log, newest first, truncated to `max_rows`.
pub fn render_trades(trades: &[Trade], max_rows: usize) -> String {
    let mut out = format!("Trades ({})\n", trades.len());
    if trades.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<8} {:<4} {:<6} {:>14} {:>14} {:>14} {:<8} {}",
        "ID", "SIDE", "SYMBOL", "QUANTITY", "PRICE", "VALUE", "STATUS", "TIME"
    );
    for trade in trades.iter().take(max_rows) {
        let _ = writeln!(
            out,
            "  {:<8} {:<4} {:<6} {:>14} {:>14} {:>14} {:<8} {}",
            trade.short_id(),
            trade.side.to_string(),
            trade.symbol,
            format_number(trade.quantity),
            format_number(trade.price),
            format_number(trade.value),
            trade.status.to_string(),
            trade.time,
        );
    }
    if trades.len() > max_rows {
        let _ = writeln!(out, "  ... {} more", trades.len() - max_rows);
    }
    out
}

/// One-paragraph description of a fetched chart.
pub fn render_chart_summary(request: &ChartRequest, payload: &ChartPayload) -> String {
    format!(
        "{}\n  fields: {}\n  points: {}\n  image:  {} bytes (base64)\n",
        request.title(),
        request.fields_param(),
        payload.candle_count(),
        payload.image.len()
    )
}
