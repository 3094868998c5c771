//! Error types for language-model operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur while talking to the inference endpoint
#[derive(Error, Debug)]
pub enum LLMError {
    /// Endpoint could not be reached (connection refused, DNS, timeout)
    #[error("Language model endpoint unavailable: {0}")]
    Unavailable(String),

    /// Reply did not carry the expected `response` text field
    #[error("Malformed response from language model: {0}")]
    MalformedResponse(String),

    /// Endpoint answered with a non-success status
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Model not found on the endpoint
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<stockbot_utils::ConfigError> for LLMError {
    fn from(err: stockbot_utils::ConfigError) -> Self {
        LLMError::ConfigurationError(err.to_string())
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            LLMError::Unavailable(err.to_string())
        } else if err.is_decode() {
            LLMError::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            LLMError::ConfigurationError(err.to_string())
        } else {
            LLMError::RequestFailed(err.to_string())
        }
    }
}
