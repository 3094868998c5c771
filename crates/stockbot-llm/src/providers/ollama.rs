//! Ollama provider implementation
//!
//! Talks to the `/api/generate` endpoint of a local Ollama server with
//! streaming disabled, so every call is one POST and one JSON reply.
//!
//! # Example
//!
//! ```no_run
//! use stockbot_llm::providers::{OllamaConfig, OllamaProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OllamaProvider::with_config(OllamaConfig::default().with_model("llama3"))?;
//!     let reply = provider.ask("Say hello in one word.").await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

use crate::{GenerateRequest, GenerateResponse, LLMError, LLMProvider, Result, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const GENERATE_PATH: &str = "/api/generate";

/// Configuration for the Ollama provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Server base URL (default: "http://localhost:11434")
    pub base_url: String,

    /// Model used by `ask` (default: "llama3")
    pub model: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Create a config for the given server with default model and timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    /// Create config from environment variables
    ///
    /// Reads `OLLAMA_HOST`, `OLLAMA_MODEL` and `OLLAMA_TIMEOUT_SECS`; unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let base_url = stockbot_utils::env_or("OLLAMA_HOST", DEFAULT_OLLAMA_BASE_URL);
        let model = stockbot_utils::env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL);
        let timeout_secs =
            stockbot_utils::env_parse::<u64>("OLLAMA_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            model,
            timeout_secs,
        })
    }

    /// Set the server base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full URL of the generate endpoint
    pub fn generate_url(&self) -> String {
        format!("{}{GENERATE_PATH}", self.base_url)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `OLLAMA_HOST` is often given as `host:port`; add a scheme and drop trailing slashes.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Ollama provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OllamaConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Send `prompt` to the configured model and return the raw reply text
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest::builder(&self.config.model)
            .prompt(prompt)
            .build();
        Ok(self.generate(request).await?.text)
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %request.model, base_url = %self.config.base_url))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!("Sending generate request to {}", self.config.generate_url());

        let ollama_request = OllamaRequest::from(request);

        let response = self
            .client
            .post(self.config.generate_url())
            .json(&ollama_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                404 => LLMError::ModelNotFound(ollama_request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let body = response.text().await?;
        let parsed = parse_generate_body(&body)?;

        debug!(
            "Received reply - done: {}, chars: {}",
            parsed.done,
            parsed.text.len()
        );

        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// ============================================================================
// Ollama wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

impl From<GenerateRequest> for OllamaRequest {
    fn from(request: GenerateRequest) -> Self {
        Self {
            model: request.model,
            prompt: request.prompt,
            stream: false,
            system: request.system,
            options: request
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: Option<String>,
    response: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

/// Parse the generate reply body, insisting on a string `response` field
fn parse_generate_body(body: &str) -> Result<GenerateResponse> {
    let parsed: OllamaResponse = serde_json::from_str(body)
        .map_err(|e| LLMError::MalformedResponse(format!("Failed to parse response: {e}")))?;

    let text = parsed
        .response
        .ok_or_else(|| LLMError::MalformedResponse("missing `response` field".to_string()))?;

    let usage = match (parsed.prompt_eval_count, parsed.eval_count) {
        (None, None) => None,
        (input, output) => Some(TokenUsage {
            input_tokens: input.unwrap_or(0),
            output_tokens: output.unwrap_or(0),
        }),
    };

    Ok(GenerateResponse {
        text,
        model: parsed.model.unwrap_or_default(),
        done: parsed.done,
        usage,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OllamaProvider {
        let config = OllamaConfig::new(server.uri()).with_model("llama3").with_timeout(5);
        OllamaProvider::with_config(config).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(normalize_base_url("localhost:11434/"), "http://localhost:11434");
        assert_eq!(
            normalize_base_url("https://gpu-box:11434"),
            "https://gpu-box:11434"
        );
        let config = OllamaConfig::default().with_base_url("127.0.0.1:9999/");
        assert_eq!(config.generate_url(), "http://127.0.0.1:9999/api/generate");
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            std::env::set_var("OLLAMA_HOST", "ollama.internal:11434");
            std::env::set_var("OLLAMA_MODEL", "mistral");
            std::env::set_var("OLLAMA_TIMEOUT_SECS", "30");
        }

        let config = OllamaConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://ollama.internal:11434");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.timeout_secs, 30);

        unsafe {
            std::env::remove_var("OLLAMA_HOST");
            std::env::remove_var("OLLAMA_MODEL");
            std::env::remove_var("OLLAMA_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerateRequest::builder("llama3")
            .prompt("hi")
            .temperature(0.2)
            .build();
        let value = serde_json::to_value(OllamaRequest::from(request)).unwrap();

        assert_eq!(value["model"], "llama3");
        assert_eq!(value["prompt"], "hi");
        assert_eq!(value["stream"], false);
        assert!(value.get("system").is_none());
        assert!((value["options"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_body_with_usage() {
        let body = r#"{"model":"llama3","response":"{\"ticker\":\"AAPL\"}","done":true,"prompt_eval_count":12,"eval_count":8}"#;
        let parsed = parse_generate_body(body).unwrap();

        assert_eq!(parsed.text, r#"{"ticker":"AAPL"}"#);
        assert_eq!(parsed.model, "llama3");
        assert!(parsed.done);
        assert_eq!(parsed.usage.map(|u| u.total()), Some(20));
    }

    #[test]
    fn test_parse_body_missing_response() {
        let result = parse_generate_body(r#"{"model":"llama3","done":true}"#);
        assert!(matches!(result, Err(LLMError::MalformedResponse(_))));

        let result = parse_generate_body("<html>gateway error</html>");
        assert!(matches!(result, Err(LLMError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_ask_posts_generate_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({
                "model": "llama3",
                "prompt": "Apple stock for the last 10 days",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "response": "{\"ticker\": \"AAPL\", \"period\": \"10d\"}",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let reply = provider.ask("Apple stock for the last 10 days").await.unwrap();

        assert_eq!(reply, r#"{"ticker": "AAPL", "period": "10d"}"#);
    }

    #[tokio::test]
    async fn test_missing_response_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .mount(&server)
            .await;

        let result = provider_for(&server).ask("hello").await;
        assert!(matches!(result, Err(LLMError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_http_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"model not found"}"#),
            )
            .mount(&server)
            .await;

        let result = provider_for(&server).ask("hello").await;
        assert!(matches!(result, Err(LLMError::ModelNotFound(model)) if model == "llama3"));
    }

    #[tokio::test]
    async fn test_server_error_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = provider_for(&server).ask("hello").await;
        match result {
            Err(LLMError::RequestFailed(msg)) => assert!(msg.contains("500")),
            other => panic!("Expected RequestFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        // Nothing listens on port 1
        let config = OllamaConfig::new("http://127.0.0.1:1").with_timeout(5);
        let provider = OllamaProvider::with_config(config).unwrap();

        let result = provider.ask("hello").await;
        assert!(matches!(result, Err(LLMError::Unavailable(_))));
    }

    #[test]
    fn test_provider_name() {
        let provider = OllamaProvider::with_config(OllamaConfig::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.config().model, "llama3");
    }
}
