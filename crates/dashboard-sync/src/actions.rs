//! User-initiated one-shot actions: buying and charting.

use dashboard_core::{
    BuyReceipt, ChartPayload, ChartRequest, Fault, TradingService, ValidationFault,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info};

/// A buy order checked against the available cash.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyTicket {
    pub symbol: String,
    /// Number of coins
    pub amount: Decimal,
    pub ask_price: Decimal,
    /// `amount * ask_price`
    pub total: Decimal,
}

impl BuyTicket {
    /// Price a buy and check that it is affordable.
    ///
    /// Unknown cash counts as zero.
    pub fn new(
        symbol: &str,
        amount: Decimal,
        ask_price: Decimal,
        available_cash: Option<Decimal>,
    ) -> Result<Self, ValidationFault> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ValidationFault::MissingSymbol);
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationFault::NonPositiveAmount);
        }

        let total = amount * ask_price;
        let available = available_cash.unwrap_or(Decimal::ZERO);
        if total > available {
            return Err(ValidationFault::InsufficientFunds {
                required: total,
                available,
            });
        }

        Ok(Self {
            symbol: symbol.to_uppercase(),
            amount,
            ask_price,
            total,
        })
    }
}

/// Quotes, buys and charts against the remote service.
///
/// Every call is a single request. Nothing is retried; a buy in particular
/// is not idempotent.
#[derive(Clone)]
pub struct UserActions {
    service: Arc<dyn TradingService>,
}

impl UserActions {
    pub fn new(service: Arc<dyn TradingService>) -> Self {
        Self { service }
    }

    pub async fn quote(&self, symbol: &str) -> Result<Decimal, Fault> {
        let symbol = required_symbol(symbol)?;
        self.service
            .fetch_quote(&symbol)
            .await
            .inspect_err(|fault| error!(symbol, error = %fault, "Quote failed"))
    }

    /// Quote `symbol` and build a ticket for `amount` coins.
    pub async fn prepare_buy(
        &self,
        symbol: &str,
        amount: Decimal,
        available_cash: Option<Decimal>,
    ) -> Result<BuyTicket, Fault> {
        required_symbol(symbol)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationFault::NonPositiveAmount.into());
        }
        let ask_price = self.quote(symbol).await?;
        Ok(BuyTicket::new(symbol, amount, ask_price, available_cash)?)
    }

    pub async fn buy(&self, ticket: &BuyTicket) -> Result<BuyReceipt, Fault> {
        match self.service.place_buy(&ticket.symbol, ticket.amount).await {
            Ok(receipt) => {
                info!(
                    symbol = %ticket.symbol,
                    amount = %ticket.amount,
                    status = %receipt.status,
                    "Buy submitted"
                );
                Ok(receipt)
            }
            Err(fault) => {
                error!(symbol = %ticket.symbol, error = %fault, "Buy failed");
                Err(fault)
            }
        }
    }

    pub async fn chart(&self, request: &ChartRequest) -> Result<ChartPayload, Fault> {
        self.service.fetch_chart(request).await.inspect_err(|fault| {
            error!(chart = %request.title(), error = %fault, "Chart request failed")
        })
    }

    /// Ask for commentary on a chart fetched with the same request.
    pub async fn ask_ai(
        &self,
        request: &ChartRequest,
        payload: &ChartPayload,
    ) -> Result<String, Fault> {
        self.service
            .ask_ai(request, &payload.data)
            .await
            .inspect_err(|fault| error!(chart = %request.title(), error = %fault, "AI request failed"))
    }
}

/// Trimmed, upper-cased symbol, or `MissingSymbol` when blank.
fn required_symbol(symbol: &str) -> Result<String, ValidationFault> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ValidationFault::MissingSymbol);
    }
    Ok(symbol.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedService;
    use dashboard_core::{ChartInterval, ChartSpan, PriceField};
    use rust_decimal_macros::dec;

    #[test]
    fn test_ticket_checks_cash() {
        let ticket = BuyTicket::new("eth", dec!(0.5), dec!(3000), Some(dec!(1500))).unwrap();
        assert_eq!(ticket.symbol, "ETH");
        assert_eq!(ticket.total, dec!(1500));

        assert_eq!(
            BuyTicket::new("ETH", dec!(1), dec!(3000), Some(dec!(1500))),
            Err(ValidationFault::InsufficientFunds {
                required: dec!(3000),
                available: dec!(1500),
            })
        );
        assert!(matches!(
            BuyTicket::new("ETH", dec!(1), dec!(3000), None),
            Err(ValidationFault::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_ticket_rejects_bad_input() {
        assert_eq!(
            BuyTicket::new(" ", dec!(1), dec!(1), Some(dec!(10))),
            Err(ValidationFault::MissingSymbol)
        );
        assert_eq!(
            BuyTicket::new("BTC", dec!(0), dec!(1), Some(dec!(10))),
            Err(ValidationFault::NonPositiveAmount)
        );
    }

    #[tokio::test]
    async fn test_prepare_and_buy() {
        let service = ScriptedService::new();
        service.set_quote(dec!(100));
        let actions = UserActions::new(service.clone());

        let ticket = actions
            .prepare_buy("sol", dec!(2), Some(dec!(500)))
            .await
            .unwrap();
        assert_eq!(ticket.total, dec!(200));

        let receipt = actions.buy(&ticket).await.unwrap();
        assert_eq!(receipt.status, "success");
        assert_eq!(service.calls("buy"), 1);
    }

    #[tokio::test]
    async fn test_unaffordable_buy_is_not_submitted() {
        let service = ScriptedService::new();
        service.set_quote(dec!(100));
        let actions = UserActions::new(service.clone());

        let err = actions
            .prepare_buy("SOL", dec!(10), Some(dec!(500)))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.calls("buy"), 0);
    }

    #[tokio::test]
    async fn test_blank_symbol_rejected_before_quote() {
        let service = ScriptedService::new();
        service.set_quote(dec!(100));
        let actions = UserActions::new(service.clone());

        let err = actions
            .prepare_buy("   ", dec!(1), Some(dec!(100)))
            .await
            .unwrap_err();
        assert_eq!(err, Fault::Validation(ValidationFault::MissingSymbol));

        let err = actions.quote("").await.unwrap_err();
        assert_eq!(err, Fault::Validation(ValidationFault::MissingSymbol));
        assert_eq!(service.calls("quote"), 0);
    }

    #[tokio::test]
    async fn test_failed_buy_is_not_retried() {
        let service = ScriptedService::new();
        service.fail("buy");
        let actions = UserActions::new(service.clone());
        let ticket = BuyTicket::new("BTC", dec!(1), dec!(1), Some(dec!(1))).unwrap();

        assert!(actions.buy(&ticket).await.is_err());
        assert_eq!(service.calls("buy"), 1);
    }

    #[tokio::test]
    async fn test_chart_then_commentary() {
        let service = ScriptedService::new();
        let actions = UserActions::new(service.clone());
        let request = ChartRequest::try_new(
            Some("btc"),
            Some(ChartInterval::Day),
            Some(ChartSpan::Month),
            &[PriceField::ClosePrice],
        )
        .unwrap();

        let payload = actions.chart(&request).await.unwrap();
        assert_eq!(payload.candle_count(), 1);

        let text = actions.ask_ai(&request, &payload).await.unwrap();
        assert_eq!(text, "BTC looks flat");
    }
}
