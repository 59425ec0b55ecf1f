//! Account, profit and trade feeds, and the dashboard that schedules them.

use async_trait::async_trait;
use chrono::Utc;
use dashboard_core::{Fault, PositionMap, Trade, TradingService};
use std::sync::{Arc, Mutex, PoisonError, RwLockWriteGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::reconciler::TradeLogReconciler;
use crate::scheduler::{PollTask, PollingScheduler, SchedulerHandle};
use crate::view_model::{read_view, write_view, DashboardViewModel, SharedViewModel};

/// Refresh period of each feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    pub cash: Duration,
    pub profit: Duration,
    pub trades: Duration,
}

impl Default for PollCadence {
    fn default() -> Self {
        Self {
            cash: Duration::from_secs(600),
            profit: Duration::from_secs(10),
            trades: Duration::from_secs(10),
        }
    }
}

/// Write guard on the view, or `None` once `cancel` has fired.
///
/// The token is checked after the guard is taken, so a stop that lands while
/// this task waits for the lock still wins.
fn live_view<'a>(
    view: &'a SharedViewModel,
    cancel: &CancellationToken,
) -> Option<RwLockWriteGuard<'a, DashboardViewModel>> {
    let vm = write_view(view);
    if cancel.is_cancelled() {
        return None;
    }
    Some(vm)
}

struct CashFeed {
    service: Arc<dyn TradingService>,
    view: SharedViewModel,
}

impl CashFeed {
    fn apply(&self, cash: rust_decimal::Decimal, cancel: &CancellationToken) {
        let Some(mut vm) = live_view(&self.view, cancel) else {
            return;
        };
        vm.account.set_cash(cash);
        vm.updated.cash = Some(Utc::now());
    }
}

#[async_trait]
impl PollTask for CashFeed {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), Fault> {
        let cash = self.service.fetch_account_info().await?;
        self.apply(cash, cancel);
        Ok(())
    }

    fn name(&self) -> &str {
        "cash"
    }
}

struct ProfitFeed {
    service: Arc<dyn TradingService>,
    view: SharedViewModel,
}

impl ProfitFeed {
    fn apply(&self, profit: rust_decimal::Decimal, cancel: &CancellationToken) {
        let Some(mut vm) = live_view(&self.view, cancel) else {
            return;
        };
        vm.account.set_profit(profit);
        vm.updated.profit = Some(Utc::now());
    }
}

#[async_trait]
impl PollTask for ProfitFeed {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), Fault> {
        let profit = self.service.fetch_profit().await?;
        self.apply(profit, cancel);
        Ok(())
    }

    fn name(&self) -> &str {
        "profit"
    }
}

/// Keeps the trade log and the position map consistent with each other.
struct TradeFeed {
    service: Arc<dyn TradingService>,
    view: SharedViewModel,
    reconciler: Mutex<TradeLogReconciler>,
}

impl TradeFeed {
    /// Commit a trade log, together with positions when they were refreshed.
    ///
    /// A cancelled commit leaves the reconciler untouched as well, so the
    /// next run still sees the length change.
    fn commit(
        &self,
        trades: Vec<Trade>,
        positions: Option<PositionMap>,
        cancel: &CancellationToken,
    ) {
        let Some(mut vm) = live_view(&self.view, cancel) else {
            debug!("Dropping trade log commit after shutdown");
            return;
        };
        self.reconciler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .commit(trades.clone());

        let now = Utc::now();
        vm.trades = trades;
        vm.updated.trades = Some(now);
        if let Some(positions) = positions {
            vm.positions = positions;
            vm.updated.positions = Some(now);
        }
    }
}

#[async_trait]
impl PollTask for TradeFeed {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), Fault> {
        let fetched = self.service.fetch_trades().await?;
        let outcome = self
            .reconciler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reconcile(fetched);

        if !outcome.positions_dirty {
            self.commit(outcome.next, None, cancel);
            return Ok(());
        }

        debug!(trades = outcome.next.len(), "Trade count changed, refreshing positions");
        // Nothing is committed if positions fail, so the next poll retries
        // both and the two never drift apart.
        let positions = self.service.fetch_positions().await?;
        self.commit(outcome.next, Some(positions), cancel);
        Ok(())
    }

    fn name(&self) -> &str {
        "trades"
    }
}

/// The live dashboard: shared view model plus the feeds that refresh it.
pub struct Dashboard {
    service: Arc<dyn TradingService>,
    view: SharedViewModel,
    cadence: PollCadence,
    cash: Arc<CashFeed>,
    profit: Arc<ProfitFeed>,
    trades: Arc<TradeFeed>,
}

impl Dashboard {
    pub fn new(service: Arc<dyn TradingService>, cadence: PollCadence) -> Self {
        let view = DashboardViewModel::shared();
        Self {
            cash: Arc::new(CashFeed {
                service: service.clone(),
                view: view.clone(),
            }),
            profit: Arc::new(ProfitFeed {
                service: service.clone(),
                view: view.clone(),
            }),
            trades: Arc::new(TradeFeed {
                service: service.clone(),
                view: view.clone(),
                reconciler: Mutex::new(TradeLogReconciler::new()),
            }),
            service,
            view,
            cadence,
        }
    }

    pub fn view(&self) -> SharedViewModel {
        self.view.clone()
    }

    pub fn service(&self) -> Arc<dyn TradingService> {
        self.service.clone()
    }

    /// Copy of the current view model.
    pub fn snapshot(&self) -> DashboardViewModel {
        read_view(&self.view).clone()
    }

    /// Fetch everything once, concurrently.
    ///
    /// Each fetch is applied on its own; a failure leaves that part of the
    /// view empty and is logged. Returns the number of failed fetches.
    pub async fn load_initial(&self) -> usize {
        let (trades, positions, cash, profit, catalog) = tokio::join!(
            self.service.fetch_trades(),
            self.service.fetch_positions(),
            self.service.fetch_account_info(),
            self.service.fetch_profit(),
            self.service.fetch_catalog(),
        );

        // Never cancelled; the initial load has no scheduler behind it.
        let live = CancellationToken::new();
        let mut failures = 0;

        match (trades, positions) {
            (Ok(trades), Ok(positions)) => self.trades.commit(trades, Some(positions), &live),
            (trades, positions) => {
                // Leave the log uncommitted so the first trade poll sees a
                // length change and loads positions.
                for fault in [trades.err(), positions.err()].into_iter().flatten() {
                    warn!(error = %fault, "Initial trade log or positions load failed");
                    failures += 1;
                }
            }
        }

        match cash {
            Ok(cash) => self.cash.apply(cash, &live),
            Err(fault) => {
                warn!(error = %fault, "Initial cash load failed");
                failures += 1;
            }
        }

        match profit {
            Ok(profit) => self.profit.apply(profit, &live),
            Err(fault) => {
                warn!(error = %fault, "Initial profit load failed");
                failures += 1;
            }
        }

        match catalog {
            Ok(catalog) => write_view(&self.view).catalog = catalog,
            Err(fault) => {
                warn!(error = %fault, "Initial catalog load failed");
                failures += 1;
            }
        }

        info!(service = %self.service.name(), failures, "Initial load complete");
        failures
    }

    /// Start the periodic refreshes. Dropping the handle stops them.
    pub fn start(&self) -> SchedulerHandle {
        PollingScheduler::new()
            .every(self.cadence.cash, self.cash.clone())
            .every(self.cadence.profit, self.profit.clone())
            .every(self.cadence.trades, self.trades.clone())
            .start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{trades, ScriptedService};
    use dashboard_core::Position;
    use rust_decimal_macros::dec;
    use tokio::time::sleep;

    fn positions(btc: rust_decimal::Decimal) -> PositionMap {
        let mut map = PositionMap::new();
        map.insert("BTC".into(), Position::new(btc, dec!(60000), dec!(500)));
        map
    }

    fn dashboard(service: &Arc<ScriptedService>) -> Dashboard {
        Dashboard::new(service.clone(), PollCadence::default())
    }

    #[tokio::test]
    async fn test_initial_load() {
        let service = ScriptedService::new();
        service.set_trades(trades(2));
        service.set_positions(positions(dec!(0.02)));
        service.set_cash(dec!(1234.567));
        service.set_profit(dec!(-12.5));
        service.set_catalog(&["BTC", "ETH"]);

        let dashboard = dashboard(&service);
        assert_eq!(dashboard.load_initial().await, 0);

        let vm = dashboard.snapshot();
        assert_eq!(vm.trades.len(), 2);
        assert_eq!(vm.positions.len(), 1);
        assert_eq!(vm.account.cash, Some(dec!(1234.57)));
        assert_eq!(vm.account.profit, Some(dec!(-12.5)));
        assert_eq!(vm.catalog, vec!["BTC", "ETH"]);
        assert!(vm.updated.trades.is_some());
    }

    #[tokio::test]
    async fn test_initial_load_keeps_going_after_faults() {
        let service = ScriptedService::new();
        service.set_profit(dec!(5));
        service.fail("cash");
        service.fail("catalog");

        let dashboard = dashboard(&service);
        assert_eq!(dashboard.load_initial().await, 2);

        let vm = dashboard.snapshot();
        assert_eq!(vm.account.cash, None);
        assert_eq!(vm.account.profit, Some(dec!(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_trade_refreshes_positions() {
        let service = ScriptedService::new();
        service.set_trades(trades(4));
        service.set_positions(positions(dec!(0.04)));

        let dashboard = dashboard(&service);
        dashboard.load_initial().await;
        assert_eq!(service.calls("positions"), 1);

        let _handle = dashboard.start();

        // Same length: no position refresh
        sleep(Duration::from_secs(11)).await;
        assert_eq!(service.calls("trades"), 2);
        assert_eq!(service.calls("positions"), 1);

        service.set_trades(trades(5));
        service.set_positions(positions(dec!(0.05)));
        sleep(Duration::from_secs(10)).await;
        assert_eq!(service.calls("positions"), 2);

        let vm = dashboard.snapshot();
        assert_eq!(vm.trades.len(), 5);
        assert_eq!(vm.positions["BTC"].quantity, dec!(0.05));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_change_replaces_log_without_positions() {
        let service = ScriptedService::new();
        service.set_trades(trades(3));
        let dashboard = dashboard(&service);
        dashboard.load_initial().await;
        let _handle = dashboard.start();

        let mut updated = trades(3);
        updated[0].status = dashboard_core::TradeStatus::Filled;
        service.set_trades(updated);

        sleep(Duration::from_secs(11)).await;
        assert_eq!(service.calls("positions"), 1);
        assert_eq!(
            dashboard.snapshot().trades[0].status,
            dashboard_core::TradeStatus::Filled
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_failure_retries_next_poll() {
        let service = ScriptedService::new();
        service.set_trades(trades(1));
        let dashboard = dashboard(&service);
        dashboard.load_initial().await;
        let _handle = dashboard.start();

        service.set_trades(trades(2));
        service.set_positions(positions(dec!(0.02)));
        service.fail("positions");
        sleep(Duration::from_secs(11)).await;
        assert_eq!(dashboard.snapshot().trades.len(), 1);

        service.recover("positions");
        sleep(Duration::from_secs(10)).await;
        let vm = dashboard.snapshot();
        assert_eq!(vm.trades.len(), 2);
        assert_eq!(vm.positions["BTC"].quantity, dec!(0.02));
        assert_eq!(service.calls("positions"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_failure_keeps_last_value() {
        let service = ScriptedService::new();
        service.set_profit(dec!(10));
        let dashboard = dashboard(&service);
        dashboard.load_initial().await;
        let _handle = dashboard.start();

        service.fail("profit");
        sleep(Duration::from_secs(11)).await;
        assert_eq!(dashboard.snapshot().account.profit, Some(dec!(10)));

        service.recover("profit");
        service.set_profit(dec!(20));
        sleep(Duration::from_secs(10)).await;
        assert_eq!(dashboard.snapshot().account.profit, Some(dec!(20)));
    }

    #[tokio::test]
    async fn test_cancelled_poll_is_not_applied() {
        let service = ScriptedService::new();
        service.set_trades(trades(3));
        service.set_profit(dec!(10));
        let dashboard = dashboard(&service);
        dashboard.load_initial().await;

        service.set_trades(trades(4));
        service.set_positions(positions(dec!(0.04)));
        service.set_profit(dec!(20));

        let cancelled = CancellationToken::new();
        cancelled.cancel();
        dashboard.profit.run(&cancelled).await.unwrap();
        dashboard.trades.run(&cancelled).await.unwrap();

        let vm = dashboard.snapshot();
        assert_eq!(vm.account.profit, Some(dec!(10)));
        assert_eq!(vm.trades.len(), 3);
        assert!(vm.positions.is_empty());

        // The dropped commit did not advance the reconciler either
        dashboard.trades.run(&CancellationToken::new()).await.unwrap();
        let vm = dashboard.snapshot();
        assert_eq!(vm.trades.len(), 4);
        assert_eq!(vm.positions["BTC"].quantity, dec!(0.04));
        assert_eq!(service.calls("positions"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cash_refreshes_slowly() {
        let service = ScriptedService::new();
        let dashboard = dashboard(&service);
        let _handle = dashboard.start();

        sleep(Duration::from_secs(599)).await;
        assert_eq!(service.calls("cash"), 0);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(service.calls("cash"), 1);
    }
}
