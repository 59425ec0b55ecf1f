//! Core data types for the dashboard.

mod chart;
pub mod money;
mod order;
mod position;
mod session;
mod trade;

pub use chart::{ChartInterval, ChartPayload, ChartRequest, ChartSpan, PriceField};
pub use order::{Ack, BuyReceipt};
pub use position::{AccountSnapshot, Position, PositionMap};
pub use session::{
    convert, AutoTradeSession, DurationUnit, SessionPhase, SessionRequest, TickOutcome,
};
pub use trade::{Trade, TradeSide, TradeStatus};
