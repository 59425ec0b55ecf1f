//! Acknowledgements returned by user-initiated actions.

use serde::{Deserialize, Serialize};

/// Outcome of a buy request as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyReceipt {
    pub status: String,
    pub message: String,
}

/// Acknowledgement of an auto-trade start or stop request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Response body, if the service sent one
    pub message: Option<String>,
}
