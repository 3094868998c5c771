//! Error types for the stock bot
//!
//! Every variant's `Display` text is the message shown to the user, so a
//! failed submission can be reported with `err.to_string()`.

use stockbot_llm::LLMError;
use thiserror::Error;

/// Stock bot errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Model endpoint unreachable or reply malformed
    #[error("Language model error: {0}")]
    Llm(#[from] LLMError),

    /// Model reply contained no brace-delimited object
    #[error("Couldn't find a JSON object in LLM reply.")]
    NoJsonObject,

    /// Object found but not a valid `{ticker, period}` document
    #[error("Failed to parse JSON from LLM: {0}")]
    JsonParse(String),

    /// Provider returned no prices for the ticker/period
    #[error("No data available for this ticker or date range.")]
    NoData { ticker: String, period: String },

    /// Request could not be turned into a usable query
    #[error("Sorry, I couldn't understand your request.")]
    NotUnderstood,

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Chart serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Chart file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StockError {
    /// Whether this failure belongs to the interpretation stage
    pub fn is_interpretation_error(&self) -> bool {
        matches!(
            self,
            Self::Llm(_) | Self::NoJsonObject | Self::JsonParse(_) | Self::NotUnderstood
        )
    }
}

impl From<stockbot_utils::ConfigError> for StockError {
    fn from(err: stockbot_utils::ConfigError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
