use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The width of the buckets a sales series is grouped into.
///
/// Weeks follow ISO 8601 numbering: they start on Monday and week 1 is the week
/// containing the year's first Thursday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "granularity".to_string(),
                value: s.to_string(),
            })
    }
}

/// The fixed period-to-date windows shown as summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricWindow {
    /// Year-to-date.
    Ytd,
    /// Month-to-date.
    Mtd,
    /// Week-to-date, from the Monday of the ISO week.
    Wtd,
    /// Trailing 3 calendar months.
    L3m,
    /// Trailing 6 calendar months.
    L6m,
    /// Trailing 12 calendar months.
    L12m,
}

impl MetricWindow {
    /// Every window, in the order the cards are displayed.
    pub const ALL: [MetricWindow; 6] = [
        MetricWindow::Ytd,
        MetricWindow::Mtd,
        MetricWindow::Wtd,
        MetricWindow::L3m,
        MetricWindow::L6m,
        MetricWindow::L12m,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricWindow::Ytd => "YTD",
            MetricWindow::Mtd => "MTD",
            MetricWindow::Wtd => "WTD",
            MetricWindow::L3m => "L3M",
            MetricWindow::L6m => "L6M",
            MetricWindow::L12m => "L12M",
        }
    }

    /// The number of trailing calendar months for the `L*M` windows.
    pub fn trailing_months(&self) -> Option<u32> {
        match self {
            MetricWindow::L3m => Some(3),
            MetricWindow::L6m => Some(6),
            MetricWindow::L12m => Some(12),
            _ => None,
        }
    }
}

impl fmt::Display for MetricWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
    /// The prior value is zero while the current one is not, so no percentage exists.
    NotApplicable,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Flat => "flat",
            Direction::NotApplicable => "N/A",
        };
        f.write_str(s)
    }
}
