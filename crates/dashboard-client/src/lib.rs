//! Remote trading service integrations.

mod http;

pub use http::{HttpTradingClient, ServiceConfig};
