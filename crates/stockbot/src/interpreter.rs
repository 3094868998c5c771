//! Turns a free-text request into a ticker and a period code
//!
//! The model is asked to answer with a single `{"ticker": ..., "period": ...}`
//! object. Replies are scanned for the first flat object (`\{[^{}]+\}`), so
//! prose around the JSON is tolerated. Objects with nested braces are not
//! recognised; that is a known limitation of the pattern.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use stockbot_llm::{GenerateRequest, LLMProvider};
use tracing::{debug, instrument};

use crate::error::{Result, StockError};

/// Period words the model uses for "the most recent day"
const LATEST_PERIOD_WORDS: &[&str] = &["last", "latest", "recent", "now"];

/// Period code substituted for [`LATEST_PERIOD_WORDS`]
pub const LATEST_PERIOD: &str = "1d";

static FLAT_JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]+\}").expect("flat object pattern is valid"));

/// Ticker and period extracted from a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    pub ticker: String,
    pub period: String,
}

impl ParsedQuery {
    /// Validate the ticker and normalise the period.
    ///
    /// The period is otherwise passed through as given; unsupported codes
    /// surface later as an empty price series.
    pub fn new(ticker: &str, period: &str) -> Result<Self> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(StockError::NotUnderstood);
        }

        Ok(Self {
            ticker: ticker.to_uppercase(),
            period: normalize_period(period),
        })
    }
}

/// Shape of the object the model is asked to produce
#[derive(Debug, Deserialize)]
struct RawQuery {
    ticker: String,
    #[serde(default)]
    period: String,
}

/// Build the extraction prompt for `user_text`
pub fn build_prompt(user_text: &str) -> String {
    format!(
        "You are an AI that extracts stock information. \
         Only reply with a JSON object like this: {{\"ticker\": \"AAPL\", \"period\": \"1mo\"}}. \
         Do not include any explanation.\n\nUser input: '{user_text}'"
    )
}

/// First brace-delimited span without nested braces, if any
pub fn find_json_object(reply: &str) -> Option<&str> {
    FLAT_JSON_OBJECT.find(reply).map(|m| m.as_str())
}

/// Map "last"/"latest"/"recent"/"now" (any case) to `1d`; anything else unchanged
pub fn normalize_period(period: &str) -> String {
    let lowered = period.to_lowercase();
    if LATEST_PERIOD_WORDS.contains(&lowered.as_str()) {
        LATEST_PERIOD.to_string()
    } else {
        period.to_string()
    }
}

/// Parse a raw model reply into a query
pub fn parse_reply(reply: &str) -> Result<ParsedQuery> {
    let object = find_json_object(reply).ok_or(StockError::NoJsonObject)?;

    let raw: RawQuery =
        serde_json::from_str(object).map_err(|e| StockError::JsonParse(e.to_string()))?;

    ParsedQuery::new(&raw.ticker, &raw.period)
}

/// Asks the language model to interpret requests
pub struct QueryInterpreter {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl QueryInterpreter {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Extract ticker and period from `user_text`
    #[instrument(skip(self), fields(model = %self.model))]
    pub async fn extract(&self, user_text: &str) -> Result<ParsedQuery> {
        let request = GenerateRequest::builder(&self.model)
            .prompt(build_prompt(user_text))
            .build();

        let reply = self.provider.generate(request).await?.text;
        debug!(reply = %reply, "model reply");

        let query = parse_reply(&reply)?;
        debug!(ticker = %query.ticker, period = %query.period, "interpreted request");
        Ok(query)
    }
}
