//! Response formatting

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use super::commands::Command;
use super::{Outcome, Report};
use crate::error::StockError;
use crate::series::Direction;

pub trait Formatter: Send + Sync {
    fn format_report(&self, report: &Report) -> String;
    fn format_error(&self, error: &StockError) -> String;
    fn format_help(&self) -> String;

    fn format_outcome(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Success(report) => self.format_report(report),
            Outcome::Failure(err) => self.format_error(err),
        }
    }
}

/// Plain-terminal formatter
#[derive(Debug, Default, Clone, Copy)]
pub struct CliFormatter {
    /// Colour the change cell green/red
    pub color: bool,
}

impl CliFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn metric_table(self, report: &Report) -> Table {
        let mut change = Cell::new(report.delta_text()).set_alignment(CellAlignment::Right);
        if self.color && report.pct_change.is_some() {
            change = change.fg(match report.direction {
                Direction::Up => Color::Green,
                Direction::Down => Color::Red,
            });
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                format!("{} Current Price", report.ticker),
                "Period Start".to_string(),
                "Change".to_string(),
                "Target Price".to_string(),
                "Period".to_string(),
            ])
            .add_row(vec![
                Cell::new(report.current_price_text()).set_alignment(CellAlignment::Right),
                Cell::new(report.first_price_text()).set_alignment(CellAlignment::Right),
                change,
                Cell::new(report.target_price_text()).set_alignment(CellAlignment::Right),
                Cell::new(display_period(&report.period)),
            ]);
        table
    }
}

impl Formatter for CliFormatter {
    fn format_report(&self, report: &Report) -> String {
        format!(
            "{}\n{}\n{}",
            report.headline(),
            report.price_line(),
            self.metric_table(report)
        )
    }

    fn format_error(&self, error: &StockError) -> String {
        format!("Error: {error}")
    }

    fn format_help(&self) -> String {
        Command::help_text().trim().to_string()
    }
}

fn display_period(period: &str) -> &str {
    if period.is_empty() { "-" } else { period }
}
