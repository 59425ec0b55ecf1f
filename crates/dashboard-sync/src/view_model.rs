//! Shared dashboard state.
//!
//! Each writer owns a disjoint set of fields: the cash and profit feeds write
//! `account`, the trade feed writes `trades` and `positions`, the initial
//! load writes `catalog`, and the session controller writes `session`.

use chrono::{DateTime, Utc};
use dashboard_core::{AccountSnapshot, AutoTradeSession, Position, PositionMap, Trade};
use rust_decimal::Decimal;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// When each feed last applied a successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStamps {
    pub cash: Option<DateTime<Utc>>,
    pub profit: Option<DateTime<Utc>>,
    pub trades: Option<DateTime<Utc>>,
    pub positions: Option<DateTime<Utc>>,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardViewModel {
    pub account: AccountSnapshot,
    /// Trade log, newest first
    pub trades: Vec<Trade>,
    pub positions: PositionMap,
    /// Tradeable symbols
    pub catalog: Vec<String>,
    pub session: AutoTradeSession,
    pub updated: FeedStamps,
}

impl DashboardViewModel {
    pub fn shared() -> SharedViewModel {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Sum of unrealized gains over all holdings.
    pub fn total_unrealized_gain(&self) -> Decimal {
        self.positions.values().map(Position::unrealized_gain).sum()
    }

    /// Market value of all holdings.
    pub fn holdings_value(&self) -> Decimal {
        self.positions.values().map(Position::current_value).sum()
    }
}

pub type SharedViewModel = Arc<RwLock<DashboardViewModel>>;

/// Read the view model. A poisoned lock still yields the last state.
pub fn read_view(view: &SharedViewModel) -> RwLockReadGuard<'_, DashboardViewModel> {
    view.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write the view model. A poisoned lock still yields the last state.
pub fn write_view(view: &SharedViewModel) -> RwLockWriteGuard<'_, DashboardViewModel> {
    view.write().unwrap_or_else(PoisonError::into_inner)
}
