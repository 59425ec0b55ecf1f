//! In-memory trading service for tests.

use async_trait::async_trait;
use dashboard_core::{
    Ack, BuyReceipt, ChartPayload, ChartRequest, DurationUnit, Fault, PositionMap, Trade,
    TradeSide, TradeStatus, TradingService,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// `count` pending trades, newest first.
pub(crate) fn trades(count: usize) -> Vec<Trade> {
    (0..count)
        .rev()
        .map(|i| Trade {
            id: format!("trade-{:04}", i),
            side: TradeSide::Buy,
            symbol: "BTC".to_string(),
            quantity: dec!(0.01),
            price: dec!(60000),
            value: dec!(600),
            status: TradeStatus::Pending,
            time: format!("2024-05-01 10:{:02}:00", i % 60),
        })
        .collect()
}

#[derive(Default)]
struct Script {
    trades: Vec<Trade>,
    positions: PositionMap,
    cash: Decimal,
    profit: Decimal,
    catalog: Vec<String>,
    quote: Decimal,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
    stop_args: Vec<(u64, DurationUnit, Vec<String>)>,
}

/// Answers from a mutable script and counts every call.
#[derive(Default)]
pub(crate) struct ScriptedService {
    script: Mutex<Script>,
}

impl ScriptedService {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn set_trades(&self, trades: Vec<Trade>) {
        self.script.lock().unwrap().trades = trades;
    }

    pub(crate) fn set_positions(&self, positions: PositionMap) {
        self.script.lock().unwrap().positions = positions;
    }

    pub(crate) fn set_cash(&self, cash: Decimal) {
        self.script.lock().unwrap().cash = cash;
    }

    pub(crate) fn set_profit(&self, profit: Decimal) {
        self.script.lock().unwrap().profit = profit;
    }

    pub(crate) fn set_catalog(&self, catalog: &[&str]) {
        self.script.lock().unwrap().catalog = catalog.iter().map(|s| s.to_string()).collect();
    }

    pub(crate) fn set_quote(&self, quote: Decimal) {
        self.script.lock().unwrap().quote = quote;
    }

    /// Make `op` fail with a network fault until [`ScriptedService::recover`].
    pub(crate) fn fail(&self, op: &'static str) {
        self.script.lock().unwrap().failing.insert(op);
    }

    pub(crate) fn recover(&self, op: &'static str) {
        self.script.lock().unwrap().failing.remove(op);
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.script.lock().unwrap().calls.get(op).copied().unwrap_or(0)
    }

    pub(crate) fn stop_args(&self) -> Vec<(u64, DurationUnit, Vec<String>)> {
        self.script.lock().unwrap().stop_args.clone()
    }

    fn enter(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, Script>, Fault> {
        let mut script = self.script.lock().unwrap();
        *script.calls.entry(op).or_insert(0) += 1;
        if script.failing.contains(op) {
            return Err(Fault::Network(format!("{} unavailable", op)));
        }
        Ok(script)
    }
}

#[async_trait]
impl TradingService for ScriptedService {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, Fault> {
        Ok(self.enter("trades")?.trades.clone())
    }

    async fn fetch_positions(&self) -> Result<PositionMap, Fault> {
        Ok(self.enter("positions")?.positions.clone())
    }

    async fn fetch_account_info(&self) -> Result<Decimal, Fault> {
        Ok(self.enter("cash")?.cash)
    }

    async fn fetch_profit(&self) -> Result<Decimal, Fault> {
        Ok(self.enter("profit")?.profit)
    }

    async fn fetch_catalog(&self) -> Result<Vec<String>, Fault> {
        Ok(self.enter("catalog")?.catalog.clone())
    }

    async fn fetch_quote(&self, _symbol: &str) -> Result<Decimal, Fault> {
        Ok(self.enter("quote")?.quote)
    }

    async fn place_buy(&self, symbol: &str, amount: Decimal) -> Result<BuyReceipt, Fault> {
        self.enter("buy")?;
        Ok(BuyReceipt {
            status: "success".to_string(),
            message: format!("Bought {} {}", amount, symbol),
        })
    }

    async fn start_auto_trade(
        &self,
        _duration: u64,
        _unit: DurationUnit,
        _symbols: &[String],
    ) -> Result<Ack, Fault> {
        self.enter("start")?;
        Ok(Ack::default())
    }

    async fn stop_auto_trade(
        &self,
        duration: u64,
        unit: DurationUnit,
        symbols: &[String],
    ) -> Result<Ack, Fault> {
        let mut script = self.script.lock().unwrap();
        script.stop_args.push((duration, unit, symbols.to_vec()));
        drop(script);
        self.enter("stop")?;
        Ok(Ack::default())
    }

    async fn fetch_chart(&self, request: &ChartRequest) -> Result<ChartPayload, Fault> {
        self.enter("chart")?;
        Ok(ChartPayload {
            data: serde_json::json!([{ "symbol": request.symbol }]),
            image: "iVBORw0KGgo=".to_string(),
        })
    }

    async fn ask_ai(
        &self,
        request: &ChartRequest,
        _data: &serde_json::Value,
    ) -> Result<String, Fault> {
        self.enter("ai")?;
        Ok(format!("{} looks flat", request.symbol))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
