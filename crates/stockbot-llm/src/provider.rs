//! LLM provider trait definition

use crate::{GenerateRequest, GenerateResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations send one prompt to a model and hand back its reply.
/// There is no retry at this layer; a failed call is reported as is.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a reply for the request
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Get the provider name (e.g., "ollama")
    fn name(&self) -> &'static str;
}
