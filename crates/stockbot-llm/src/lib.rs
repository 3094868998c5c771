//! Language-model client for stockbot
//!
//! This crate wraps a locally hosted inference endpoint behind a small
//! provider abstraction:
//!
//! - Generate request/response types
//! - The `LLMProvider` trait
//! - An Ollama implementation (behind the `ollama` feature, on by default)

pub mod completion;
pub mod error;
pub mod provider;

// Re-export main types
pub use completion::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, TokenUsage};
pub use error::{LLMError, Result};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "ollama")]
pub mod providers;
