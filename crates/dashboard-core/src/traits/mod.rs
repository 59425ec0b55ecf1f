//! Core traits for the dashboard.

mod service;

pub use service::TradingService;
