//! Market data providers

pub mod yahoo;

use async_trait::async_trait;

use crate::error::Result;
use crate::series::PriceSeries;

pub use yahoo::YahooFinanceClient;

/// Source of historical closing prices
///
/// Unknown tickers and unsupported period codes are not errors: they come
/// back as an empty [`PriceSeries`].
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Closing prices for `ticker` over `period`, with target price when known
    async fn fetch(&self, ticker: &str, period: &str) -> Result<PriceSeries>;

    /// Provider name (e.g., "yahoo")
    fn name(&self) -> &'static str;
}
