//! CLI command implementations.

pub mod auto_trade;
pub mod buy;
pub mod chart;
pub mod cryptos;
pub mod quote;
pub mod validate;
pub mod watch;
