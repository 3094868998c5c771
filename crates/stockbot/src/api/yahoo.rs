//! Yahoo Finance API client

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

use super::MarketDataProvider;
use crate::config::BotConfig;
use crate::error::{Result, StockError};
use crate::series::{PricePoint, PriceSeries};

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const REFERER: &str = "https://finance.yahoo.com/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance API client
///
/// Price history goes through `yahoo_finance_api`; the analyst target price
/// comes from the `quoteSummary` endpoint, which needs a session cookie and
/// a crumb token.
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    http: Client,
    interval: String,
    request_timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a client fetching bars of `interval` (e.g. "1d")
    pub fn new(interval: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let connector = yahoo::YahooConnector::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            connector,
            http,
            interval: interval.into(),
            request_timeout,
        })
    }

    /// Create a client from bot configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(&config.interval, config.request_timeout)
    }

    /// Bar interval requested from Yahoo
    pub fn interval(&self) -> &str {
        &self.interval
    }

    /// Timeout applied to every Yahoo request, history included
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Closing prices for `symbol` over the period code `range`.
    ///
    /// Provider-side failures (unknown symbol, unsupported range, no quotes)
    /// yield an empty list.
    #[instrument(skip(self))]
    pub async fn get_history(&self, symbol: &str, range: &str) -> Vec<PricePoint> {
        let response = match self
            .connector
            .get_quote_range(symbol, &self.interval, range)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Yahoo returned no history for {symbol}/{range}: {e}");
                return Vec::new();
            }
        };

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                debug!("No quotes in Yahoo response for {symbol}/{range}: {e}");
                return Vec::new();
            }
        };

        quotes
            .iter()
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp, 0).map(|date| PricePoint::new(date, q.close))
            })
            .collect()
    }

    /// Analyst target mean price for `symbol`; `None` when Yahoo has none or
    /// the lookup fails.
    pub async fn get_target_mean_price(&self, symbol: &str) -> Option<f64> {
        match self.fetch_target_mean_price(symbol).await {
            Ok(target) => target,
            Err(e) => {
                debug!("Target price lookup failed for {symbol}: {e}");
                None
            }
        }
    }

    async fn fetch_target_mean_price(&self, symbol: &str) -> Result<Option<f64>> {
        let crumb = self.fetch_crumb().await?;

        let mut url = Url::parse(QUOTE_SUMMARY_URL)
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| StockError::YahooFinanceError("invalid quoteSummary URL".to_string()))?
            .push(symbol);

        let body = self
            .http
            .get(url)
            .query(&[("modules", "financialData"), ("crumb", crumb.as_str())])
            .header("referer", REFERER)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_target_mean_price(&body)
    }

    /// Session cookie from fc.yahoo.com, then a crumb bound to it
    async fn fetch_crumb(&self) -> Result<String> {
        // fc.yahoo.com answers 404 but still sets the session cookie
        self.http
            .get(COOKIE_URL)
            .header("referer", REFERER)
            .send()
            .await?;

        let body = self
            .http
            .get(CRUMB_URL)
            .header("referer", REFERER)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        validate_crumb(&body)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<PriceSeries> {
        let points = self.get_history(ticker, period).await;
        let series = PriceSeries::new(ticker, period, points);

        if series.is_empty() {
            return Ok(series);
        }

        let target = self.get_target_mean_price(ticker).await;
        Ok(series.with_target_mean_price(target))
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

fn validate_crumb(body: &str) -> Result<String> {
    let crumb = body.trim();

    if crumb.contains("<html") || crumb.contains("<!DOCTYPE") {
        return Err(StockError::YahooFinanceError(
            "crumb endpoint returned an HTML page".to_string(),
        ));
    }
    if crumb.to_lowercase().contains("too many requests") {
        return Err(StockError::YahooFinanceError(
            "rate limited while fetching crumb".to_string(),
        ));
    }
    if crumb.is_empty() || crumb.len() >= 100 || crumb.contains(' ') {
        return Err(StockError::YahooFinanceError(format!(
            "unexpected crumb: {crumb:?}"
        )));
    }

    Ok(crumb.to_string())
}

// ============================================================================
// quoteSummary response structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Deserialize)]
struct FinancialData {
    #[serde(rename = "targetMeanPrice", default)]
    target_mean_price: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; absent values are `{}`
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn parse_target_mean_price(body: &str) -> Result<Option<f64>> {
    let response: QuoteSummaryResponse = serde_json::from_str(body)?;

    if let Some(error) = response.quote_summary.error.filter(|e| !e.is_null()) {
        return Err(StockError::YahooFinanceError(format!(
            "quoteSummary error: {error}"
        )));
    }

    Ok(response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .find_map(|r| r.financial_data?.target_mean_price?.raw)
        .filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_mean_price() {
        let body = r#"{"quoteSummary":{"result":[{"financialData":{"maxAge":86400,
            "currentPrice":{"raw":189.84,"fmt":"189.84"},
            "targetMeanPrice":{"raw":205.37,"fmt":"205.37"}}}],"error":null}}"#;

        assert_eq!(parse_target_mean_price(body).unwrap(), Some(205.37));
    }

    #[test]
    fn test_parse_target_mean_price_absent() {
        let body = r#"{"quoteSummary":{"result":[{"financialData":{"targetMeanPrice":{}}}],"error":null}}"#;
        assert_eq!(parse_target_mean_price(body).unwrap(), None);

        let body = r#"{"quoteSummary":{"result":[{}],"error":null}}"#;
        assert_eq!(parse_target_mean_price(body).unwrap(), None);
    }

    #[test]
    fn test_parse_target_mean_price_api_error() {
        let body = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: ZZZZINVALID"}}}"#;
        assert!(matches!(
            parse_target_mean_price(body),
            Err(StockError::YahooFinanceError(msg)) if msg.contains("Not Found")
        ));
    }

    #[test]
    fn test_validate_crumb() {
        assert_eq!(validate_crumb("abcD3f.gh\n").unwrap(), "abcD3f.gh");
        assert!(validate_crumb("").is_err());
        assert!(validate_crumb("<!DOCTYPE html><html></html>").is_err());
        assert!(validate_crumb("Too Many Requests").is_err());
    }

    #[test]
    fn test_client_from_config() {
        let config = BotConfig::default();
        let client = YahooFinanceClient::from_config(&config).unwrap();
        assert_eq!(client.interval(), "1d");
        assert_eq!(client.request_timeout(), config.request_timeout);
        assert_eq!(client.name(), "yahoo");
    }

    #[test]
    fn test_configured_timeout_reaches_client() {
        let config = BotConfig::builder()
            .request_timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        let client = YahooFinanceClient::from_config(&config).unwrap();

        assert_eq!(client.request_timeout(), Duration::from_millis(1500));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_history() {
        let client = YahooFinanceClient::new("1d", Duration::from_secs(30)).unwrap();
        let series = client.fetch("AAPL", "1mo").await.unwrap();

        assert!(!series.is_empty());
        assert_eq!(series.ticker(), "AAPL");
        assert!(series.points().windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_invalid_ticker_is_empty() {
        let client = YahooFinanceClient::new("1d", Duration::from_secs(30)).unwrap();
        let series = client.fetch("ZZZZINVALID", "1mo").await.unwrap();

        assert!(series.is_empty());
        assert_eq!(series.target_mean_price(), None);
    }
}
