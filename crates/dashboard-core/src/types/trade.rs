//! Trade log entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money;

/// Trade side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Trade status as reported by the remote trade log.
///
/// Statuses the dashboard does not know about are kept as `Unknown` so one
/// odd row never fails a whole poll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeStatus {
    Pending,
    Filled,
    Failed,
    Unknown(String),
}

impl TradeStatus {
    /// Check if the trade has settled (filled or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Filled | TradeStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Filled => "filled",
            TradeStatus::Failed => "failed",
            TradeStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TradeStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => TradeStatus::Pending,
            "filled" => TradeStatus::Filled,
            "failed" => TradeStatus::Failed,
            _ => TradeStatus::Unknown(raw),
        }
    }
}

impl From<TradeStatus> for String {
    fn from(status: TradeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// A single entry of the remote trade log. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Opaque identifier
    pub id: String,
    #[serde(rename = "type")]
    pub side: TradeSide,
    /// Asset symbol
    #[serde(rename = "crypto")]
    pub symbol: String,
    /// Number of coins
    #[serde(rename = "amount", with = "money")]
    pub quantity: Decimal,
    /// Unit price
    #[serde(with = "money")]
    pub price: Decimal,
    /// Monetary value of the trade
    #[serde(with = "money")]
    pub value: Decimal,
    pub status: TradeStatus,
    /// Display timestamp, passed through as sent
    pub time: String,
}

impl Trade {
    /// Length of the identifier prefix shown in the trade log.
    pub const SHORT_ID_LEN: usize = 8;

    /// Identifier truncated for display.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(Self::SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ROW: &str = r#"{
        "id": "3f2a9c1e-77aa-4b1e-9d3c-0a1b2c3d4e5f",
        "type": "buy",
        "crypto": "BTC",
        "amount": "0.0015",
        "price": "$64,250.50",
        "value": "96.38",
        "status": "filled",
        "time": "10:42 AM"
    }"#;

    #[test]
    fn test_trade_decode() {
        let trade: Trade = serde_json::from_str(ROW).unwrap();
        assert_eq!(trade.side, TradeSide::Buy);
        assert_eq!(trade.symbol, "BTC");
        assert_eq!(trade.quantity, dec!(0.0015));
        assert_eq!(trade.price, dec!(64250.50));
        assert_eq!(trade.status, TradeStatus::Filled);
        assert_eq!(trade.short_id(), "3f2a9c1e");
    }

    #[test]
    fn test_short_id_shorter_than_prefix() {
        let mut trade: Trade = serde_json::from_str(ROW).unwrap();
        trade.id = "abc".to_string();
        assert_eq!(trade.short_id(), "abc");
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let row = ROW.replace("\"filled\"", "\"queued\"");
        let trade: Trade = serde_json::from_str(&row).unwrap();
        assert_eq!(trade.status, TradeStatus::Unknown("queued".to_string()));
        assert!(!trade.status.is_terminal());
        assert_eq!(trade.status.to_string(), "QUEUED");
    }
}
