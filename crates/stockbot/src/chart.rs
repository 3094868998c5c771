//! Plotly chart description for a price series
//!
//! [`render`] builds a [`ChartSpec`] that serializes to a Plotly figure
//! (`{"data", "layout", "config"}`). The figure is computed from the series
//! alone and has no setters; [`ChartSpec::to_html`] wraps it in a standalone
//! page.

use serde::Serialize;
use std::path::Path;

use crate::error::{Result, StockError};
use crate::series::{Direction, PriceSeries};

/// Share of the observed price range added above and below the line
pub const Y_PADDING_RATIO: f64 = 0.15;

/// Padding used when every close is identical
pub const FLAT_SERIES_PADDING: f64 = 1.0;

const BACKGROUND: &str = "#181a20";
const FONT_COLOR: &str = "#f5f6fa";
const FONT_FAMILY: &str = "Inter, Arial, sans-serif";
const TICK_COLOR: &str = "#888";
const HOVER_TEMPLATE: &str =
    "<b>Date:</b> %{x|%b %d, %Y}<br><b>Close:</b> $%{y:.2f}<extra></extra>";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Line and translucent fill colour for one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub line: &'static str,
    pub fill: &'static str,
}

pub const UP_COLORS: ColorPair = ColorPair {
    line: "#16c784",
    fill: "rgba(22,199,132,0.15)",
};

pub const DOWN_COLORS: ColorPair = ColorPair {
    line: "#ea3943",
    fill: "rgba(234,57,67,0.15)",
};

/// Colour pair for a direction
pub fn colors_for(direction: Direction) -> ColorPair {
    match direction {
        Direction::Up => UP_COLORS,
        Direction::Down => DOWN_COLORS,
    }
}

/// Padding applied to the y-axis for the given extremes
pub fn y_axis_padding(min: f64, max: f64) -> f64 {
    if max > min {
        (max - min) * Y_PADDING_RATIO
    } else {
        FLAT_SERIES_PADDING
    }
}

/// `[min - pad, max + pad]`
pub fn y_axis_range(min: f64, max: f64) -> [f64; 2] {
    let pad = y_axis_padding(min, max);
    [min - pad, max + pad]
}

// ============================================================================
// Plotly figure types
// ============================================================================

/// Render-only chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    data: Vec<Trace>,
    layout: Layout,
    config: PlotConfig,
    #[serde(skip)]
    direction: Direction,
    #[serde(skip)]
    title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: &'static str,
    pub name: String,
    pub line: Line,
    pub fill: &'static str,
    pub fillcolor: &'static str,
    pub hovertemplate: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: u32,
    pub shape: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub showlegend: bool,
    pub plot_bgcolor: &'static str,
    pub paper_bgcolor: &'static str,
    pub font: Font,
    pub margin: Margin,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
    pub hovermode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub showgrid: bool,
    pub showline: bool,
    pub zeroline: bool,
    pub tickfont: Font,
    pub ticks: &'static str,
    pub tickcolor: &'static str,
    pub ticklen: u32,
    pub tickwidth: u32,
    pub tickformat: &'static str,
    pub rangeselector: RangeSelector,
    #[serde(rename = "type")]
    pub axis_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub showgrid: bool,
    pub showline: bool,
    pub zeroline: bool,
    pub tickfont: Font,
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSelector {
    pub buttons: Vec<RangeButton>,
    pub bgcolor: &'static str,
    pub activecolor: &'static str,
    pub x: f64,
    pub y: f64,
    pub font: Font,
}

/// Quick-select window on the x-axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub label: &'static str,
    pub step: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<&'static str>,
}

impl RangeButton {
    fn backward(count: u32, label: &'static str, step: &'static str) -> Self {
        Self {
            count: Some(count),
            label,
            step,
            stepmode: Some("backward"),
        }
    }

    fn all(label: &'static str) -> Self {
        Self {
            count: None,
            label,
            step: "all",
            stepmode: None,
        }
    }
}

/// 1D, 5D, 1M, 6M and full range
pub fn range_buttons() -> Vec<RangeButton> {
    vec![
        RangeButton::backward(1, "1D", "day"),
        RangeButton::backward(5, "5D", "day"),
        RangeButton::backward(1, "1M", "month"),
        RangeButton::backward(6, "6M", "month"),
        RangeButton::all("MAX"),
    ]
}

/// Plotly config; the mode bar is hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotConfig {
    #[serde(rename = "displayModeBar")]
    pub display_mode_bar: bool,
    pub responsive: bool,
}

fn tick_font() -> Font {
    Font {
        color: TICK_COLOR,
        family: None,
        size: 13,
    }
}

/// Build the chart for `series`, labelled with `ticker`.
///
/// Fails with [`StockError::NoData`] for an empty series.
pub fn render(series: &PriceSeries, ticker: &str) -> Result<ChartSpec> {
    let no_data = || StockError::NoData {
        ticker: ticker.to_string(),
        period: series.period().to_string(),
    };

    let direction = series.direction().ok_or_else(no_data)?;
    let (min, max) = series
        .min_close()
        .zip(series.max_close())
        .ok_or_else(no_data)?;
    let colors = colors_for(direction);
    let title = format!("{} Close Price", ticker.to_uppercase());

    let trace = Trace {
        trace_type: "scatter",
        x: series
            .points()
            .iter()
            .map(|p| p.date.format("%Y-%m-%d %H:%M:%S").to_string())
            .collect(),
        y: series.points().iter().map(|p| p.close).collect(),
        mode: "lines",
        name: title.clone(),
        line: Line {
            color: colors.line,
            width: 3,
            shape: "spline",
        },
        fill: "tozeroy",
        fillcolor: colors.fill,
        hovertemplate: HOVER_TEMPLATE,
    };

    let layout = Layout {
        showlegend: false,
        plot_bgcolor: BACKGROUND,
        paper_bgcolor: BACKGROUND,
        font: Font {
            color: FONT_COLOR,
            family: Some(FONT_FAMILY),
            size: 16,
        },
        margin: Margin {
            l: 0,
            r: 0,
            t: 0,
            b: 0,
        },
        xaxis: XAxis {
            showgrid: false,
            showline: false,
            zeroline: false,
            tickfont: tick_font(),
            ticks: "outside",
            tickcolor: "#222",
            ticklen: 8,
            tickwidth: 2,
            tickformat: "%b %d",
            rangeselector: RangeSelector {
                buttons: range_buttons(),
                bgcolor: "#232323",
                activecolor: colors.line,
                x: 0.5,
                y: 1.15,
                font: Font {
                    color: "#fff",
                    family: None,
                    size: 13,
                },
            },
            axis_type: "date",
        },
        yaxis: YAxis {
            showgrid: false,
            showline: false,
            zeroline: false,
            tickfont: tick_font(),
            range: y_axis_range(min, max),
        },
        hovermode: "x unified",
    };

    Ok(ChartSpec {
        data: vec![trace],
        layout,
        config: PlotConfig {
            display_mode_bar: false,
            responsive: true,
        },
        direction,
        title,
    })
}

impl ChartSpec {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn colors(&self) -> ColorPair {
        colors_for(self.direction)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn trace(&self) -> &Trace {
        &self.data[0]
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn y_range(&self) -> [f64; 2] {
        self.layout.yaxis.range
    }

    /// Plotly figure as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Standalone HTML page drawing the figure with plotly.js
    pub fn to_html(&self) -> Result<String> {
        // Keep "</script>" inside string values from closing the tag
        let figure = self.to_json()?.replace("</", "<\\/");

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             <script src=\"{PLOTLY_CDN}\"></script>\n\
             <style>html,body{{margin:0;background:{BACKGROUND};}}</style>\n</head>\n<body>\n\
             <div id=\"chart\" style=\"width:100%;height:100vh;\"></div>\n\
             <script>\nconst figure = {figure};\n\
             Plotly.newPlot(\"chart\", figure.data, figure.layout, figure.config);\n</script>\n\
             </body>\n</html>\n",
            title = escape_html(&self.title),
        ))
    }

    /// Write [`Self::to_html`] to `path`, creating parent directories
    pub fn write_html(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_html()?)?;
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
