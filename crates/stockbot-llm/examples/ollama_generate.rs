//! Send one prompt to a local Ollama server and print the reply
//!
//! ```bash
//! export OLLAMA_HOST="http://localhost:11434"
//! export OLLAMA_MODEL="llama3"
//! cargo run -p stockbot-llm --example ollama_generate -- "Name one stock ticker."
//! ```

use stockbot_llm::providers::OllamaProvider;
use stockbot_llm::{GenerateRequest, LLMProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockbot_utils::init_tracing("info");

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello! Please respond with a brief greeting.".to_string());

    let provider = OllamaProvider::from_env()?;
    println!("Provider: {}", provider.name());
    println!("  Endpoint: {}", provider.config().generate_url());
    println!("  Model: {}\n", provider.config().model);

    let request = GenerateRequest::builder(&provider.config().model)
        .prompt(prompt)
        .temperature(0.7)
        .build();

    let response = provider.generate(request).await?;
    println!("{}", response.text);

    if let Some(usage) = response.usage {
        println!(
            "\nTokens: {} in / {} out ({} total)",
            usage.input_tokens,
            usage.output_tokens,
            usage.total()
        );
    }

    Ok(())
}
