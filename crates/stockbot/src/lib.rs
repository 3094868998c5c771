//! Stock Price Bot
//!
//! Ask about a stock in plain English and get its recent closing prices as a
//! chart, with the current price, the change over the window and the analyst
//! target price.
//!
//! - A local language model (Ollama) turns the request into a ticker and a
//!   period code ([`interpreter`])
//! - Yahoo Finance supplies the closing prices and target price ([`api`])
//! - A Plotly figure is built from the series ([`chart`])
//! - [`bot::StockBot`] wires the three together, one submission at a time
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbot::{BotConfig, StockBot, YahooFinanceClient};
//! use stockbot_llm::providers::OllamaProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let market = Arc::new(YahooFinanceClient::from_config(&config)?);
//!     let llm = OllamaProvider::from_env()?;
//!     let model = llm.config().model.clone();
//!
//!     let bot = StockBot::with_provider(Arc::new(llm), model, market, config);
//!     let report = bot.submit("Tesla over the last 6 months").await.into_result()?;
//!
//!     println!("{}", report.price_line());
//!     std::fs::write("tsla.html", report.chart.to_html()?)?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod chart;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod series;

#[cfg(test)]
mod testing;

pub use api::{MarketDataProvider, YahooFinanceClient};
pub use bot::{Command, Outcome, Report, StockBot};
pub use chart::ChartSpec;
pub use config::BotConfig;
pub use error::{Result, StockError};
pub use interpreter::{ParsedQuery, QueryInterpreter};
pub use series::{Direction, PricePoint, PriceSeries};
