//! Command parsing for the interactive shell
//!
//! Lines starting with `/` are shell commands; everything else is a stock
//! request handed to the bot.

/// Parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show help
    Help,
    /// Exit the shell
    Exit,
    /// Slash command the shell does not know
    Unknown { name: String },
    /// Free-text stock request
    Query { text: String },
}

impl Command {
    /// Parse a line of input; blank input yields `None`
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if input.is_empty() {
            return None;
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Some(Command::Query {
                text: input.to_string(),
            });
        };

        let name = rest
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        Some(match name.as_str() {
            "help" | "h" | "?" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            _ => Command::Unknown { name },
        })
    }

    /// Help text for the shell
    pub fn help_text() -> &'static str {
        r#"
Stock Price Bot
===============

Ask for a stock in plain English, for example:
  - "Apple stock for the last 10 days"
  - "How is TSLA doing over 6 months?"
  - "Microsoft latest"

The model picks a ticker and a period (1d, 5d, 1mo, 6mo, max, ...), then
the bot prints the current price, the change over the period and the
analyst target price.

Commands:
  /help    Show this help      (/h, /?)
  /exit    Exit                (/quit, /q)
"#
    }
}
