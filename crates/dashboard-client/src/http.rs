//! HTTP integration with the remote trading service.

use async_trait::async_trait;
use dashboard_core::error::Fault;
use dashboard_core::traits::TradingService;
use dashboard_core::types::{
    money, Ack, BuyReceipt, ChartPayload, ChartRequest, DurationUnit, PositionMap, Trade,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Remote service connection settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Remote service response types
#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    account_info: AccountInfo,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    #[serde(with = "money")]
    cash_available_for_withdrawal: Decimal,
}

#[derive(Debug, Deserialize)]
struct ProfitResponse {
    #[serde(rename = "successfulTradesSum", with = "money")]
    successful_trades_sum: Decimal,
}

#[derive(Debug, Deserialize)]
struct PositionsResponse {
    positions: PositionMap,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    cryptos: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    data: QuoteData,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(with = "money")]
    ask_price: Decimal,
}

#[derive(Debug, Deserialize)]
struct BuyResponse {
    message: BuyMessage,
}

/// The buy endpoint answers either with a status object or a bare message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BuyMessage {
    Detailed {
        status: String,
        #[serde(rename = "Message")]
        message: String,
    },
    Text(String),
}

#[derive(Debug, Deserialize)]
struct AiResponse {
    response: String,
}

/// HTTP client for the remote trading service.
pub struct HttpTradingClient {
    config: ServiceConfig,
    client: Client,
}

impl HttpTradingClient {
    /// Create a new client.
    pub fn new(config: ServiceConfig) -> Result<Self, Fault> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Fault::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), Fault> {
        let resp = request
            .send()
            .await
            .map_err(|e| Fault::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Fault::Network(e.to_string()))?;
        Ok((status, body.to_vec()))
    }

    async fn send_ok(&self, request: RequestBuilder) -> Result<Vec<u8>, Fault> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(rejection(status, &body));
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Fault> {
        let body = self.send_ok(self.request(Method::GET, path)).await?;
        decode(&body)
    }

    fn auto_trade_path(duration: u64, unit: DurationUnit, symbols: &[String]) -> String {
        format!("/auto-trade/{}/{}/{}", duration, unit, symbols.join(","))
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> Fault {
    Fault::RemoteRejection {
        status: status.as_u16(),
        message: String::from_utf8_lossy(body).trim().to_string(),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Fault> {
    serde_json::from_slice(body).map_err(|e| Fault::MalformedResponse(e.to_string()))
}

fn ack(body: &[u8]) -> Ack {
    let text = String::from_utf8_lossy(body).trim().to_string();
    Ack {
        message: (!text.is_empty()).then_some(text),
    }
}

/// Map a chart response status to a fault.
///
/// The chart service reports an unprocessable interval/span pairing as a
/// plain 500.
fn chart_fault(status: StatusCode, body: &[u8], request: &ChartRequest) -> Fault {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        Fault::InvalidParameterCombination {
            interval: request.interval.to_string(),
            span: request.span.to_string(),
        }
    } else {
        rejection(status, body)
    }
}

#[async_trait]
impl TradingService for HttpTradingClient {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, Fault> {
        self.get_json("/get-trades").await
    }

    async fn fetch_positions(&self) -> Result<PositionMap, Fault> {
        let resp: PositionsResponse = self.get_json("/positions").await?;
        Ok(resp.positions)
    }

    async fn fetch_account_info(&self) -> Result<Decimal, Fault> {
        let resp: AccountInfoResponse = self.get_json("/account_info").await?;
        Ok(resp.account_info.cash_available_for_withdrawal)
    }

    async fn fetch_profit(&self) -> Result<Decimal, Fault> {
        let resp: ProfitResponse = self.get_json("/todays-change").await?;
        Ok(resp.successful_trades_sum)
    }

    async fn fetch_catalog(&self) -> Result<Vec<String>, Fault> {
        let resp: CatalogResponse = self.get_json("/get-cryptos").await?;
        Ok(resp.cryptos)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Decimal, Fault> {
        let resp: QuoteResponse = self.get_json(&format!("/crypto-info/{}", symbol)).await?;
        Ok(resp.data.ask_price)
    }

    async fn place_buy(&self, symbol: &str, amount: Decimal) -> Result<BuyReceipt, Fault> {
        let path = format!("/buy-crypto/{}/{}", symbol, amount);
        let body = self.send_ok(self.request(Method::GET, &path)).await?;
        let resp: BuyResponse = decode(&body)?;

        let receipt = match resp.message {
            BuyMessage::Detailed { status, message } => BuyReceipt { status, message },
            BuyMessage::Text(message) => BuyReceipt {
                status: "submitted".to_string(),
                message,
            },
        };
        debug!("Buy answered: {} {} ({})", amount, symbol, receipt.status);
        Ok(receipt)
    }

    async fn start_auto_trade(
        &self,
        duration: u64,
        unit: DurationUnit,
        symbols: &[String],
    ) -> Result<Ack, Fault> {
        let path = Self::auto_trade_path(duration, unit, symbols);
        let body = self.send_ok(self.request(Method::GET, &path)).await?;
        debug!("Auto-trade start acknowledged: {} {} on {:?}", duration, unit, symbols);
        Ok(ack(&body))
    }

    async fn stop_auto_trade(
        &self,
        duration: u64,
        unit: DurationUnit,
        symbols: &[String],
    ) -> Result<Ack, Fault> {
        let path = Self::auto_trade_path(duration, unit, symbols);
        let body = self.send_ok(self.request(Method::POST, &path)).await?;
        debug!("Auto-trade stop acknowledged");
        Ok(ack(&body))
    }

    async fn fetch_chart(&self, request: &ChartRequest) -> Result<ChartPayload, Fault> {
        let path = format!(
            "/get-crypto-graph/{}/{}/{}/{}",
            request.symbol,
            request.interval,
            request.span,
            request.fields_param()
        );
        let (status, body) = self.send(self.request(Method::GET, &path)).await?;
        if !status.is_success() {
            return Err(chart_fault(status, &body, request));
        }
        decode(&body)
    }

    async fn ask_ai(
        &self,
        request: &ChartRequest,
        data: &serde_json::Value,
    ) -> Result<String, Fault> {
        let path = format!(
            "/ask-ai/{}/{}/{}",
            request.symbol, request.interval, request.span
        );
        let body = self
            .send_ok(self.request(Method::POST, &path).json(data))
            .await?;
        let resp: AiResponse = decode(&body)?;
        Ok(resp.response)
    }

    fn name(&self) -> &str {
        &self.config.base_url
    }
}
