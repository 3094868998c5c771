//! Stock Price Bot CLI
//!
//! # Usage
//!
//! ```bash
//! # Local Ollama server with a pulled model
//! ollama pull llama3
//!
//! # Interactive shell
//! cargo run --bin stock-bot -p stockbot
//!
//! # One request, chart written next to you
//! cargo run --bin stock-bot -p stockbot -- --query "Apple stock for the last 10 days" --chart-out aapl.html
//! ```

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stockbot::bot::{CliFormatter, Command, Formatter, StockBot};
use stockbot::{BotConfig, YahooFinanceClient};
use stockbot_llm::providers::{OllamaConfig, OllamaProvider};

#[derive(Debug, Parser)]
#[command(name = "stock-bot", version, about = "Ask about a stock, get its price chart")]
struct Args {
    /// Ollama model used to interpret requests [env: OLLAMA_MODEL]
    #[arg(long)]
    model: Option<String>,

    /// Ollama server URL [env: OLLAMA_HOST]
    #[arg(long)]
    llm_url: Option<String>,

    /// Model request timeout in seconds [env: OLLAMA_TIMEOUT_SECS]
    #[arg(long)]
    timeout: Option<u64>,

    /// Bar interval for price history [env: STOCKBOT_INTERVAL]
    #[arg(long)]
    interval: Option<String>,

    /// Write the HTML chart here after each successful request [env: STOCKBOT_CHART_OUT]
    #[arg(long, value_name = "FILE")]
    chart_out: Option<PathBuf>,

    /// Run a single request and exit
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

fn print_banner(welcome: &str) {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                      Stock Price Bot                         ║
║                                                              ║
║  Ask in plain English:                                       ║
║    "Apple stock for the last 10 days"                        ║
║    "How has NVDA done over 6 months?"                        ║
║                                                              ║
║    /help  - Help                                             ║
║    /exit  - Exit                                             ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
    println!("{welcome}\n");
}

fn llm_config(args: &Args) -> anyhow::Result<OllamaConfig> {
    let mut config = OllamaConfig::from_env()?;
    if let Some(url) = &args.llm_url {
        config = config.with_base_url(url);
    }
    if let Some(model) = &args.model {
        config = config.with_model(model);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }
    Ok(config)
}

fn bot_config(args: &Args) -> anyhow::Result<BotConfig> {
    let mut builder = BotConfig::builder();
    if let Some(interval) = &args.interval {
        builder = builder.interval(interval);
    }
    if let Some(path) = &args.chart_out {
        builder = builder.chart_output(path);
    }
    Ok(builder.with_env()?.build()?)
}

async fn run_repl(bot: &StockBot, formatter: &CliFormatter) -> anyhow::Result<()> {
    print_banner(bot.welcome());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let Some(command) = Command::parse(&input) else {
            continue;
        };

        match command {
            Command::Help => println!("{}\n", formatter.format_help()),
            Command::Exit => {
                println!("Goodbye!");
                break;
            }
            Command::Unknown { name } => {
                eprintln!("Unknown command: /{name} (try /help)\n");
            }
            Command::Query { text } => {
                let outcome = bot.submit(&text).await;
                if outcome.is_success() {
                    println!("{}\n", formatter.format_outcome(&outcome));
                } else {
                    eprintln!("{}\n", formatter.format_outcome(&outcome));
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    stockbot_utils::init_tracing("warn,stockbot=info");

    let args = Args::parse();

    let llm_config = llm_config(&args).context("invalid language model settings")?;
    let config = bot_config(&args).context("invalid bot settings")?;

    tracing::info!(
        llm = %llm_config.base_url,
        model = %llm_config.model,
        interval = %config.interval,
        "starting stock bot"
    );

    let model = llm_config.model.clone();
    let provider = Arc::new(OllamaProvider::with_config(llm_config)?);
    let market = Arc::new(YahooFinanceClient::from_config(&config)?);
    let formatter = CliFormatter::new(!args.no_color);
    let bot = StockBot::with_provider(provider, model, market, config);

    if let Some(text) = &args.query {
        let outcome = bot.submit(text).await;
        return Ok(if outcome.is_success() {
            println!("{}", formatter.format_outcome(&outcome));
            ExitCode::SUCCESS
        } else {
            eprintln!("{}", formatter.format_outcome(&outcome));
            ExitCode::FAILURE
        });
    }

    run_repl(&bot, &formatter).await?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "stock-bot",
            "--model",
            "mistral",
            "--chart-out",
            "out.html",
            "--query",
            "apple",
        ]);
        assert_eq!(args.model.as_deref(), Some("mistral"));
        assert_eq!(args.chart_out, Some(PathBuf::from("out.html")));
        assert_eq!(args.query.as_deref(), Some("apple"));
        assert!(!args.no_color);
    }

    #[test]
    fn test_flags_override_llm_settings() {
        let args = Args::parse_from([
            "stock-bot",
            "--llm-url",
            "gpu-box:11434/",
            "--timeout",
            "5",
        ]);
        let config = llm_config(&args).unwrap();
        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_request_timeout_default() {
        let args = Args::parse_from(["stock-bot", "--interval", "1h"]);
        let config = bot_config(&args).unwrap();
        assert_eq!(config.interval, "1h");
        assert!(config.request_timeout >= Duration::from_secs(1));
    }
}
