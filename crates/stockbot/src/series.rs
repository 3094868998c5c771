//! Historical closing-price series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: DateTime<Utc>, close: f64) -> Self {
        Self { date, close }
    }
}

/// Whether the price rose or fell over the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closing prices for one ticker over one period, ascending by date.
///
/// An empty series is a valid value: it is what the provider hands back for
/// unknown tickers and unsupported periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    period: String,
    points: Vec<PricePoint>,
    target_mean_price: Option<f64>,
}

impl PriceSeries {
    /// Build a series; points are sorted by date and non-finite closes dropped.
    pub fn new(
        ticker: impl Into<String>,
        period: impl Into<String>,
        mut points: Vec<PricePoint>,
    ) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.date);

        Self {
            ticker: ticker.into(),
            period: period.into(),
            points,
            target_mean_price: None,
        }
    }

    /// An empty series for `ticker`/`period`
    pub fn empty(ticker: impl Into<String>, period: impl Into<String>) -> Self {
        Self::new(ticker, period, Vec::new())
    }

    /// Attach the analyst target mean price
    pub fn with_target_mean_price(mut self, target: Option<f64>) -> Self {
        self.target_mean_price = target.filter(|v| v.is_finite());
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn target_mean_price(&self) -> Option<f64> {
        self.target_mean_price
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first_close(&self) -> Option<f64> {
        self.points.first().map(|p| p.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn min_close(&self) -> Option<f64> {
        self.closes().reduce(f64::min)
    }

    pub fn max_close(&self) -> Option<f64> {
        self.closes().reduce(f64::max)
    }

    /// Up when the last close is at or above the first one
    pub fn direction(&self) -> Option<Direction> {
        let (first, last) = (self.first_close()?, self.last_close()?);
        Some(if last >= first {
            Direction::Up
        } else {
            Direction::Down
        })
    }

    /// `(last - first) / first * 100`; `None` when empty or the first close is zero
    pub fn pct_change(&self) -> Option<f64> {
        let (first, last) = (self.first_close()?, self.last_close()?);
        if first.abs() < f64::EPSILON {
            return None;
        }
        Some((last - first) / first * 100.0)
    }

    fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Daily series starting 2024-01-02
    pub(crate) fn daily(ticker: &str, closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
            .collect();
        PriceSeries::new(ticker, "1mo", points)
    }

    #[test]
    fn test_points_sorted_ascending() {
        let d1 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let series = PriceSeries::new(
            "AAPL",
            "5d",
            vec![PricePoint::new(d2, 2.0), PricePoint::new(d1, 1.0)],
        );

        assert_eq!(series.first_close(), Some(1.0));
        assert_eq!(series.last_close(), Some(2.0));
    }

    #[test]
    fn test_non_finite_closes_dropped() {
        let series = daily("AAPL", &[1.0, f64::NAN, 3.0]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.min_close(), Some(1.0));
        assert_eq!(series.max_close(), Some(3.0));
    }

    #[test]
    fn test_pct_change() {
        let series = daily("AAPL", &[100.0, 95.0, 110.0]);
        let pct = series.pct_change().unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
        assert_eq!(format!("{pct:.2}%"), "10.00%");
    }

    #[test]
    fn test_pct_change_zero_first_close() {
        assert_eq!(daily("X", &[0.0, 5.0]).pct_change(), None);
    }

    #[test]
    fn test_direction() {
        assert_eq!(daily("A", &[10.0, 12.0]).direction(), Some(Direction::Up));
        assert_eq!(daily("A", &[10.0, 10.0]).direction(), Some(Direction::Up));
        assert_eq!(daily("A", &[10.0, 9.99]).direction(), Some(Direction::Down));
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("ZZZZINVALID", "1mo");
        assert!(series.is_empty());
        assert_eq!(series.direction(), None);
        assert_eq!(series.pct_change(), None);
        assert_eq!(series.min_close(), None);
    }

    #[test]
    fn test_target_price_filters_nan() {
        let series = daily("A", &[1.0]).with_target_mean_price(Some(f64::NAN));
        assert_eq!(series.target_mean_price(), None);

        let series = daily("A", &[1.0]).with_target_mean_price(Some(250.5));
        assert_eq!(series.target_mean_price(), Some(250.5));
    }
}
