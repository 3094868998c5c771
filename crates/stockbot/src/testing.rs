//! Mocks shared by unit tests

use async_trait::async_trait;
use mockall::mock;
use stockbot_llm::{GenerateRequest, GenerateResponse, LLMProvider};

use crate::api::MarketDataProvider;
use crate::error::Result;
use crate::series::PriceSeries;

mock! {
    pub Provider {}

    #[async_trait]
    impl LLMProvider for Provider {
        async fn generate(&self, request: GenerateRequest) -> stockbot_llm::Result<GenerateResponse>;
        fn name(&self) -> &'static str;
    }
}

mock! {
    pub MarketData {}

    #[async_trait]
    impl MarketDataProvider for MarketData {
        async fn fetch(&self, ticker: &str, period: &str) -> Result<PriceSeries>;
        fn name(&self) -> &'static str;
    }
}

/// A finished model reply carrying `text`
pub fn model_reply(text: &str) -> GenerateResponse {
    GenerateResponse {
        text: text.to_string(),
        model: "llama3".to_string(),
        done: true,
        usage: None,
    }
}
