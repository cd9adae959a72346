use crate::calendar::{months_earlier, one_year_earlier, period_start, week_start};
use crate::change::{direction, percent_change};
use crate::ledger::SalesLedger;
use chrono::NaiveDate;
use core_types::{DateRange, Granularity, MetricWindow, SummaryMetric};
use rust_decimal::Decimal;

/// Computes the period-to-date summary cards straight from the ledger.
///
/// The windows depend only on the reference date, never on the display
/// granularity or range of the chart.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSummarizer {}

impl MetricsSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `SummaryMetric` per window, in `MetricWindow::ALL` order.
    pub fn summarize(
        &self,
        ledger: &SalesLedger,
        reference_date: NaiveDate,
    ) -> Vec<SummaryMetric> {
        MetricWindow::ALL
            .iter()
            .map(|&window| self.summarize_window(ledger, window, reference_date))
            .collect()
    }

    pub fn summarize_window(
        &self,
        ledger: &SalesLedger,
        window: MetricWindow,
        reference_date: NaiveDate,
    ) -> SummaryMetric {
        let current = window_range(window, reference_date);
        let prior = current.and_then(shift_back_one_year);

        let current_value = current.map_or(Decimal::ZERO, |r| ledger.sum_between(r.start, r.end));
        let prior_value = prior.map_or(Decimal::ZERO, |r| ledger.sum_between(r.start, r.end));
        let change = percent_change(current_value, prior_value);

        SummaryMetric {
            window,
            current_value,
            prior_value,
            percent_change: change,
            direction: direction(current_value, prior_value, change),
        }
    }
}

/// The inclusive date span a window covers when evaluated on `reference_date`.
pub fn window_range(window: MetricWindow, reference_date: NaiveDate) -> Option<DateRange> {
    let start = match window {
        MetricWindow::Ytd => period_start(reference_date, Granularity::Year),
        MetricWindow::Mtd => period_start(reference_date, Granularity::Month),
        MetricWindow::Wtd => week_start(reference_date),
        MetricWindow::L3m | MetricWindow::L6m | MetricWindow::L12m => {
            months_earlier(reference_date, window.trailing_months()?)?
        }
    };
    Some(DateRange::new(start, reference_date))
}

fn shift_back_one_year(range: DateRange) -> Option<DateRange> {
    Some(DateRange::new(
        one_year_earlier(range.start)?,
        one_year_earlier(range.end)?,
    ))
}
