//! Logging setup and plain-text status reports.

mod logging;
mod status;

pub use logging::{setup_logging, LogFormat};
pub use status::{render_chart_summary, render_positions, render_status, render_trades};
