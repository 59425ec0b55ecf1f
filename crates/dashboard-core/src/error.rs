//! Fault types for the dashboard.
//!
//! Every fallible operation resolves to a [`Fault`]. Nothing here is fatal:
//! a fault means "stale data shown" or "action not completed".

use rust_decimal::Decimal;
use thiserror::Error;

/// A recoverable error surfaced to a caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fault {
    /// The request could not complete (connect, timeout, transport).
    #[error("Network error: {0}")]
    Network(String),

    /// The remote service answered with a non-2xx status.
    #[error("Remote rejected request: HTTP {status}: {message}")]
    RemoteRejection { status: u16, message: String },

    /// The chart endpoint could not process the interval/span pairing.
    #[error("Invalid interval/span pairing: {interval} over {span}")]
    InvalidParameterCombination { interval: String, span: String },

    /// The remote service answered 2xx but the body did not match the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A required user selection was missing or invalid.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFault),
}

impl Fault {
    /// Check if the fault was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Fault::Validation(_))
    }

    /// Check if the remote service refused the request.
    ///
    /// `InvalidParameterCombination` is a distinguished rejection and counts too.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            Fault::RemoteRejection { .. } | Fault::InvalidParameterCombination { .. }
        )
    }

    /// Check if the request never reached a response.
    pub fn is_network(&self) -> bool {
        matches!(self, Fault::Network(_))
    }
}

/// Missing or invalid user input, detected before any request is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFault {
    #[error("Please select a cryptocurrency")]
    MissingSymbol,

    #[error("Please select an interval")]
    MissingInterval,

    #[error("Please select a span")]
    MissingSpan,

    #[error("Please select at least one price data type")]
    MissingPriceField,

    #[error("Duration must be a positive number")]
    NonPositiveDuration,

    #[error("Amount must be a positive number")]
    NonPositiveAmount,

    #[error("Unknown duration unit: {0}")]
    UnknownDurationUnit(String),

    #[error("Unknown interval: {0}")]
    UnknownInterval(String),

    #[error("Unknown span: {0}")]
    UnknownSpan(String),

    #[error("Unknown price field: {0}")]
    UnknownPriceField(String),

    #[error("Not enough cash: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },
}

/// Result type alias for dashboard operations.
pub type FaultResult<T> = Result<T, Fault>;
