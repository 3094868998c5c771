//! Configuration for the stock bot

use crate::error::{Result, StockError};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_INTERVAL: &str = "1d";

/// Configuration for the stock bot
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Bar interval requested from the market-data provider
    pub interval: String,

    /// Request timeout for market-data calls
    pub request_timeout: Duration,

    /// Where to write the HTML chart after a successful submission
    pub chart_output: Option<PathBuf>,

    /// Welcome message
    pub welcome_message: String,

    /// Prompt prefix
    pub prompt: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL.to_string(),
            request_timeout: Duration::from_secs(30),
            chart_output: None,
            welcome_message: "Stock Price Bot - ask something like: 'Apple stock for the last 10 days' (/help for help)".to_string(),
            prompt: ">>> ".to_string(),
        }
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Create config from environment variables
    ///
    /// Reads `STOCKBOT_INTERVAL`, `STOCKBOT_TIMEOUT_SECS` and
    /// `STOCKBOT_CHART_OUT`.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.interval.trim().is_empty() {
            return Err(StockError::ConfigError(
                "interval must not be empty".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    interval: Option<String>,
    request_timeout: Option<Duration>,
    chart_output: Option<PathBuf>,
    welcome_message: Option<String>,
    prompt: Option<String>,
}

impl BotConfigBuilder {
    /// Set the bar interval
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the HTML chart output path
    pub fn chart_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_output = Some(path.into());
        self
    }

    /// Set welcome message
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    /// Set prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Fill unset fields from the environment
    pub fn with_env(mut self) -> Result<Self> {
        if self.interval.is_none() {
            self.interval = stockbot_utils::env_parse::<String>("STOCKBOT_INTERVAL")?;
        }
        if self.request_timeout.is_none() {
            self.request_timeout =
                stockbot_utils::env_parse::<u64>("STOCKBOT_TIMEOUT_SECS")?.map(Duration::from_secs);
        }
        if self.chart_output.is_none() {
            self.chart_output = stockbot_utils::env_parse::<PathBuf>("STOCKBOT_CHART_OUT")?;
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            interval: self.interval.unwrap_or(defaults.interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            chart_output: self.chart_output.or(defaults.chart_output),
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.interval, "1d");
        assert_eq!(config.chart_output, None);
        assert_ok!(config.validate());
    }

    #[test]
    fn test_config_builder() {
        let config = BotConfig::builder()
            .interval("1h")
            .request_timeout(Duration::from_secs(60))
            .chart_output("out/chart.html")
            .prompt("? ")
            .build()
            .unwrap();

        assert_eq!(config.interval, "1h");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.chart_output, Some(PathBuf::from("out/chart.html")));
        assert_eq!(config.prompt, "? ");
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let result = BotConfig::builder().request_timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_blank_interval() {
        let config = BotConfig {
            interval: " ".to_string(),
            ..Default::default()
        };
        assert_err!(config.validate());
    }

    #[test]
    fn test_with_env_keeps_explicit_values() {
        unsafe {
            std::env::set_var("STOCKBOT_INTERVAL", "1wk");
            std::env::set_var("STOCKBOT_TIMEOUT_SECS", "45");
        }

        let config = BotConfig::builder()
            .interval("1d")
            .with_env()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.interval, "1d");
        assert_eq!(config.request_timeout, Duration::from_secs(45));

        unsafe {
            std::env::remove_var("STOCKBOT_INTERVAL");
            std::env::remove_var("STOCKBOT_TIMEOUT_SECS");
        }
    }
}
