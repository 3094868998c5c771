//! Stock Price Bot
//!
//! Each submission runs the same linear pipeline: the interpreter asks the
//! model for a ticker and period, the market-data provider fetches closing
//! prices, and the chart renderer builds the figure. [`StockBot::submit`]
//! maps the input text to an [`Outcome`] and keeps nothing between calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbot::api::YahooFinanceClient;
//! use stockbot::bot::{Outcome, StockBot};
//! use stockbot::config::BotConfig;
//! use stockbot_llm::providers::OllamaProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let market = Arc::new(YahooFinanceClient::from_config(&config)?);
//!     let llm = OllamaProvider::from_env()?;
//!     let model = llm.config().model.clone();
//!     let bot = StockBot::with_provider(Arc::new(llm), model, market, config);
//!
//!     if let Outcome::Success(report) = bot.submit("Apple stock for the last 10 days").await {
//!         println!("{}", report.headline());
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod formatter;

use std::sync::Arc;
use stockbot_llm::LLMProvider;
use tracing::{info, instrument, warn};

use crate::api::MarketDataProvider;
use crate::chart::{self, ChartSpec};
use crate::config::BotConfig;
use crate::error::{Result, StockError};
use crate::interpreter::QueryInterpreter;
use crate::series::{Direction, PriceSeries};

pub use commands::Command;
pub use formatter::{CliFormatter, Formatter};

/// What a successful submission displays
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub ticker: String,
    pub period: String,
    /// Last close in the window
    pub current_price: f64,
    /// First close in the window
    pub first_price: f64,
    /// `None` when the first close is zero
    pub pct_change: Option<f64>,
    pub target_price: Option<f64>,
    pub direction: Direction,
    pub points: usize,
    pub chart: ChartSpec,
}

impl Report {
    /// Build the report and chart for a non-empty series
    pub fn from_series(series: &PriceSeries) -> Result<Self> {
        let chart = chart::render(series, series.ticker())?;

        let (first_price, current_price) = series
            .first_close()
            .zip(series.last_close())
            .ok_or_else(|| StockError::NoData {
                ticker: series.ticker().to_string(),
                period: series.period().to_string(),
            })?;

        Ok(Self {
            ticker: series.ticker().to_uppercase(),
            period: series.period().to_string(),
            current_price,
            first_price,
            pct_change: series.pct_change(),
            target_price: series.target_mean_price(),
            direction: chart.direction(),
            points: series.len(),
            chart,
        })
    }

    /// e.g. "AAPL is up today!"
    pub fn headline(&self) -> String {
        format!("{} is {} today!", self.ticker, self.direction)
    }

    /// e.g. "Current Price: $189.84 | Target Price: $205.37"
    pub fn price_line(&self) -> String {
        format!(
            "Current Price: ${:.2} | Target Price: {}",
            self.current_price,
            self.target_price_text()
        )
    }

    pub fn current_price_text(&self) -> String {
        format!("${:.2}", self.current_price)
    }

    /// Close at the start of the window
    pub fn first_price_text(&self) -> String {
        format!("${:.2}", self.first_price)
    }

    pub fn target_price_text(&self) -> String {
        self.target_price
            .map_or_else(|| "N/A".to_string(), |t| format!("${t:.2}"))
    }

    /// Change over the window, e.g. "10.00%"
    pub fn pct_change_text(&self) -> String {
        self.pct_change
            .map_or_else(|| "N/A".to_string(), |p| format!("{p:.2}%"))
    }

    /// Signed change, e.g. "+10.00%" or "-3.12%"
    pub fn delta_text(&self) -> String {
        self.pct_change
            .map_or_else(|| "N/A".to_string(), |p| format!("{p:+.2}%"))
    }
}

/// Result of one submission
#[derive(Debug)]
pub enum Outcome {
    Success(Box<Report>),
    Failure(StockError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&StockError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Report> {
        match self {
            Self::Success(report) => Ok(*report),
            Self::Failure(err) => Err(err),
        }
    }
}

impl From<Result<Report>> for Outcome {
    fn from(result: Result<Report>) -> Self {
        match result {
            Ok(report) => Self::Success(Box::new(report)),
            Err(err) => Self::Failure(err),
        }
    }
}

/// Stock Price Bot
pub struct StockBot {
    interpreter: QueryInterpreter,
    market: Arc<dyn MarketDataProvider>,
    config: BotConfig,
}

impl StockBot {
    pub fn new(
        interpreter: QueryInterpreter,
        market: Arc<dyn MarketDataProvider>,
        config: BotConfig,
    ) -> Self {
        Self {
            interpreter,
            market,
            config,
        }
    }

    /// Create a bot asking `model` on `provider`
    pub fn with_provider(
        provider: Arc<dyn LLMProvider>,
        model: impl Into<String>,
        market: Arc<dyn MarketDataProvider>,
        config: BotConfig,
    ) -> Self {
        Self::new(QueryInterpreter::new(provider, model), market, config)
    }

    /// Get the welcome message
    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Run the pipeline once for `text`
    #[instrument(skip(self), fields(market = self.market.name()))]
    pub async fn submit(&self, text: &str) -> Outcome {
        let result = self.run(text).await;
        if let Err(e) = &result {
            warn!("Submission failed: {e}");
        }
        result.into()
    }

    async fn run(&self, text: &str) -> Result<Report> {
        let query = self.interpreter.extract(text).await?;

        let series = self.market.fetch(&query.ticker, &query.period).await?;
        if series.is_empty() {
            return Err(StockError::NoData {
                ticker: query.ticker,
                period: query.period,
            });
        }

        let report = Report::from_series(&series)?;
        info!(
            ticker = %report.ticker,
            period = %report.period,
            points = report.points,
            "rendered report"
        );

        if let Some(path) = &self.config.chart_output {
            report.chart.write_html(path)?;
            info!("Chart written to {}", path.display());
        }

        Ok(report)
    }
}
