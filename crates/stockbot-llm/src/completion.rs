//! Generate request and response types

use serde::{Deserialize, Serialize};

/// Single-prompt generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "llama3")
    pub model: String,

    /// Prompt text sent verbatim to the model
    pub prompt: String,

    /// Optional system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Streaming is never requested; the reply arrives as one JSON document
    pub stream: bool,
}

/// Reply from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub text: String,

    /// Model that produced the reply
    pub model: String,

    /// Whether the endpoint reported the generation as finished
    pub done: bool,

    /// Token counts, when the endpoint reports them
    pub usage: Option<TokenUsage>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens evaluated
    pub input_tokens: usize,

    /// Number of generated tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl GenerateRequest {
    /// Create a builder for generate requests
    pub fn builder(model: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(model)
    }
}

/// Builder for GenerateRequest
pub struct GenerateRequestBuilder {
    model: String,
    prompt: String,
    system: Option<String>,
    temperature: Option<f32>,
}

impl GenerateRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: String::new(),
            system: None,
            temperature: None,
        }
    }

    /// Set the prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build the request
    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            model: self.model,
            prompt: self.prompt,
            system: self.system,
            temperature: self.temperature,
            stream: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = GenerateRequest::builder("llama3")
            .prompt("Hello")
            .system("Answer in JSON")
            .temperature(0.0)
            .build();

        assert_eq!(request.model, "llama3");
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.system.as_deref(), Some("Answer in JSON"));
        assert_eq!(request.temperature, Some(0.0));
        assert!(!request.stream);
    }

    #[test]
    fn test_optional_fields_skipped() {
        let request = GenerateRequest::builder("llama3").prompt("hi").build();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"model": "llama3", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
