//! Remote trading service trait definition.

use crate::error::Fault;
use crate::types::{
    Ack, BuyReceipt, ChartPayload, ChartRequest, DurationUnit, PositionMap, Trade,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Typed boundary to the remote trading service.
///
/// Implementations hold no state of their own. Every method is a single
/// request/response pair and never panics across the reconciliation
/// boundary: failures come back as a [`Fault`].
#[async_trait]
pub trait TradingService: Send + Sync {
    /// Get the trade log, newest first.
    async fn fetch_trades(&self) -> Result<Vec<Trade>, Fault>;

    /// Get current holdings keyed by symbol.
    async fn fetch_positions(&self) -> Result<PositionMap, Fault>;

    /// Get the cash available for withdrawal.
    async fn fetch_account_info(&self) -> Result<Decimal, Fault>;

    /// Get today's realized profit.
    async fn fetch_profit(&self) -> Result<Decimal, Fault>;

    /// Get the tradeable symbols.
    async fn fetch_catalog(&self) -> Result<Vec<String>, Fault>;

    /// Get the current ask price for a symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<Decimal, Fault>;

    /// Submit a buy order.
    ///
    /// Not idempotent. Callers must not retry automatically.
    async fn place_buy(&self, symbol: &str, amount: Decimal) -> Result<BuyReceipt, Fault>;

    /// Start a remote auto-trade session.
    async fn start_auto_trade(
        &self,
        duration: u64,
        unit: DurationUnit,
        symbols: &[String],
    ) -> Result<Ack, Fault>;

    /// Stop the remote auto-trade session.
    async fn stop_auto_trade(
        &self,
        duration: u64,
        unit: DurationUnit,
        symbols: &[String],
    ) -> Result<Ack, Fault>;

    /// Get chart data and its rendered image.
    ///
    /// # Errors
    /// `Fault::InvalidParameterCombination` when the service cannot process
    /// the interval/span pairing.
    async fn fetch_chart(&self, request: &ChartRequest) -> Result<ChartPayload, Fault>;

    /// Ask for commentary on previously fetched chart data.
    async fn ask_ai(
        &self,
        request: &ChartRequest,
        data: &serde_json::Value,
    ) -> Result<String, Fault>;

    /// Get the service name.
    fn name(&self) -> &str;
}
