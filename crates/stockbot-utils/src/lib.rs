//! Shared utilities for stockbot
//!
//! This crate provides common functionality used across the stockbot workspace:
//! tracing setup and helpers for reading configuration from the environment.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_or, env_parse};
pub use logging::init_tracing;
