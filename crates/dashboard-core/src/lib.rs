//! Core types and traits for the crypto dashboard.
//!
//! This crate provides the foundational building blocks including:
//! - Account data types (Trade, Position, AccountSnapshot)
//! - Auto-trade session state and duration units
//! - Chart request types
//! - The fault taxonomy shared by every component
//! - The `TradingService` trait describing the remote trading service

pub mod error;
pub mod format;
pub mod traits;
pub mod types;

pub use error::{Fault, FaultResult, ValidationFault};
pub use traits::*;
pub use types::*;
