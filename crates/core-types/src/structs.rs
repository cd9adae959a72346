use crate::enums::{Direction, Granularity, MetricWindow};
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A loosely typed field of a raw record.
///
/// Ingestion sources disagree on types (amounts as numbers or strings, dates
/// as strings or epoch numbers), so any JSON value is accepted here and judged
/// later by `RawSalesRecord::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawField::Number(n) => write!(f, "{n}"),
            RawField::Text(s) => f.write_str(s),
            RawField::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for RawField {
    fn from(n: f64) -> Self {
        RawField::Number(n)
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

impl From<String> for RawField {
    fn from(s: String) -> Self {
        RawField::Text(s)
    }
}

/// A sales transaction exactly as the ingestion layer hands it over.
///
/// Nothing about it is trusted yet: the date may be missing or unparseable and
/// the amount may be absent, mistyped or non-finite. Unknown fields are ignored
/// when deserializing, so richer upstream records can be passed straight through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSalesRecord {
    #[serde(default)]
    pub date: Option<RawField>,
    #[serde(default)]
    pub amount: Option<RawField>,
}

impl RawSalesRecord {
    pub fn new(date: impl Into<RawField>, amount: impl Into<RawField>) -> Self {
        Self {
            date: Some(date.into()),
            amount: Some(amount.into()),
        }
    }

    /// Converts the raw record into a `SalesRecord`.
    ///
    /// Dates are accepted as `YYYY-MM-DD` text or as RFC 3339 timestamps, in
    /// which case the calendar date in the timestamp's own offset is used.
    /// Amounts are accepted as numbers or as decimal text; text is parsed
    /// straight to a `Decimal` without passing through `f64`.
    pub fn validate(&self) -> Result<SalesRecord, CoreError> {
        let date = match self.date.as_ref().ok_or(CoreError::MissingDate)? {
            RawField::Text(text) => parse_date(text)?,
            other => return Err(CoreError::InvalidDate(other.to_string())),
        };

        let amount = match self.amount.as_ref().ok_or(CoreError::MissingAmount)? {
            RawField::Number(n) => decimal_from_f64(*n)?,
            RawField::Text(text) => parse_amount(text)?,
            other => return Err(CoreError::InvalidAmount(other.to_string())),
        };

        Ok(SalesRecord { date, amount })
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.date_naive())
        .map_err(|_| CoreError::InvalidDate(text.to_string()))
}

fn decimal_from_f64(amount: f64) -> Result<Decimal, CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::NonFiniteAmount);
    }
    Decimal::from_f64(amount).ok_or(CoreError::AmountOutOfRange(amount))
}

fn parse_amount(text: &str) -> Result<Decimal, CoreError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CoreError::InvalidAmount(text.to_string()))
}

/// A validated sales transaction. All engine arithmetic works on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when `start` is after `end`; such a range contains no dates.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The user-selected filters and toggles for one recompute.
///
/// Owned and mutated by the UI layer; the engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub granularity: Granularity,
    #[serde(default)]
    pub show_anomalies: bool,
    #[serde(default)]
    pub show_moving_average: bool,
    #[serde(default)]
    pub show_past_period: bool,
}

impl FilterState {
    /// A filter over `[start_date, end_date]` with every overlay switched off.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, granularity: Granularity) -> Self {
        Self {
            start_date,
            end_date,
            granularity,
            show_anomalies: false,
            show_moving_average: false,
            show_past_period: false,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Whether the moving-average pass is needed at all.
    pub fn wants_moving_average(&self) -> bool {
        self.show_anomalies || self.show_moving_average
    }
}

/// One bucket of the grouped sales series.
///
/// The bucket covers the half-open span `[period_start, period_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedPoint {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub label: String,
    pub total_amount: Decimal,
    pub moving_average: Option<Decimal>,
    pub is_anomaly: bool,
    pub prior_year_amount: Option<Decimal>,
    pub percent_change_vs_prior_year: Option<Decimal>,
}

impl GroupedPoint {
    /// A point with only its bucket and total filled in.
    pub fn new(
        period_start: NaiveDate,
        period_end: NaiveDate,
        label: String,
        total_amount: Decimal,
    ) -> Self {
        Self {
            period_start,
            period_end,
            label,
            total_amount,
            moving_average: None,
            is_anomaly: false,
            prior_year_amount: None,
            percent_change_vs_prior_year: None,
        }
    }
}

/// A period-to-date summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetric {
    pub window: MetricWindow,
    pub current_value: Decimal,
    pub prior_value: Decimal,
    pub percent_change: Option<Decimal>, // None when prior_value is zero
    pub direction: Direction,
}
