//! Holdings and account cash.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::money;

/// Holding of a single asset. The symbol is the key of the enclosing map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Quantity held
    #[serde(with = "money")]
    pub quantity: Decimal,
    /// Current unit price
    #[serde(rename = "curr_price", with = "money")]
    pub current_price: Decimal,
    /// Original cost basis
    #[serde(rename = "og_value", with = "money")]
    pub cost_basis: Decimal,
}

impl Position {
    pub fn new(quantity: Decimal, current_price: Decimal, cost_basis: Decimal) -> Self {
        Self {
            quantity,
            current_price,
            cost_basis,
        }
    }

    /// Market value (quantity * current_price).
    pub fn current_value(&self) -> Decimal {
        self.quantity * self.current_price
    }

    /// Unrealized profit/loss against the cost basis.
    pub fn unrealized_gain(&self) -> Decimal {
        self.current_value() - self.cost_basis
    }

    pub fn is_gain(&self) -> bool {
        self.unrealized_gain() > Decimal::ZERO
    }
}

/// Positions keyed by asset symbol.
pub type PositionMap = BTreeMap<String, Position>;

/// Account cash and today's realized profit.
///
/// Both values are refreshed on independent cadences and stay `None` until
/// their first successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Cash available for withdrawal, rounded to cents
    pub cash: Option<Decimal>,
    /// Today's realized profit
    pub profit: Option<Decimal>,
}

impl AccountSnapshot {
    /// Decimal places kept for cash.
    pub const CASH_DP: u32 = 2;

    pub fn set_cash(&mut self, cash: Decimal) {
        self.cash = Some(cash.round_dp_with_strategy(
            Self::CASH_DP,
            RoundingStrategy::MidpointAwayFromZero,
        ));
    }

    pub fn set_profit(&mut self, profit: Decimal) {
        self.profit = Some(profit);
    }
}
