use crate::aggregator::Aggregator;
use crate::calendar::{next_period_start, one_year_earlier, period_start, same_iso_week_prior_year};
use crate::change::percent_change;
use crate::ledger::SalesLedger;
use chrono::{Datelike, Days, NaiveDate};
use core_types::{DateRange, Granularity, GroupedPoint};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Pairs each point of a series with the same-granularity bucket one year earlier.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComparisonEngine {
    aggregator: Aggregator,
}

impl ComparisonEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills `prior_year_amount` and `percent_change_vs_prior_year` on every point.
    ///
    /// `range` and `granularity` must be the ones the series was grouped with.
    /// Prior buckets lying wholly inside `range` are read from the series itself;
    /// any other prior bucket is totalled from the ledger over its full calendar
    /// span. When the ledger holds nothing on or before the prior bucket's last
    /// day, the comparison is left undefined rather than zero.
    pub fn pair_with_prior_year(
        &self,
        series: &mut [GroupedPoint],
        ledger: &SalesLedger,
        range: DateRange,
        granularity: Granularity,
    ) {
        let complete_buckets: HashMap<NaiveDate, Decimal> = series
            .iter()
            .filter(|p| lies_within(p, range))
            .map(|p| (p.period_start, p.total_amount))
            .collect();

        let mut paired = 0usize;
        for point in series.iter_mut() {
            let prior = prior_period_start(point.period_start, granularity)
                .filter(|&start| ledger.reaches_back_to(last_day_of_bucket(start, granularity)))
                .map(|start| {
                    complete_buckets
                        .get(&start)
                        .copied()
                        .unwrap_or_else(|| self.aggregator.bucket_total(ledger, start, granularity))
                });

            point.prior_year_amount = prior;
            point.percent_change_vs_prior_year =
                prior.and_then(|amount| percent_change(point.total_amount, amount));
            if prior.is_some() {
                paired += 1;
            }
        }

        tracing::debug!(
            granularity = %granularity,
            points = series.len(),
            paired,
            "Paired series with prior year."
        );
    }
}

/// Start of the bucket one year before the bucket starting at `start`.
///
/// Weeks align on ISO week number; every other granularity steps back twelve
/// calendar months (Feb 29 lands on Feb 28) and takes the enclosing bucket.
pub fn prior_period_start(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Week => {
            let iso = start.iso_week();
            same_iso_week_prior_year(iso.year(), iso.week())
        }
        _ => one_year_earlier(start).map(|date| period_start(date, granularity)),
    }
}

fn last_day_of_bucket(start: NaiveDate, granularity: Granularity) -> NaiveDate {
    next_period_start(start, granularity)
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(NaiveDate::MAX)
}

fn lies_within(point: &GroupedPoint, range: DateRange) -> bool {
    point.period_start >= range.start
        && point
            .period_end
            .checked_sub_days(Days::new(1))
            .is_some_and(|last| last <= range.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SalesRecord;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger(rows: &[(NaiveDate, Decimal)]) -> SalesLedger {
        SalesLedger::from_records(rows.iter().map(|&(d, a)| SalesRecord::new(d, a)).collect())
    }

    fn paired_series(
        ledger: &SalesLedger,
        range: DateRange,
        granularity: Granularity,
    ) -> Vec<GroupedPoint> {
        let mut series = Aggregator::new().group(ledger, range, granularity);
        ComparisonEngine::new().pair_with_prior_year(&mut series, ledger, range, granularity);
        series
    }

    #[test]
    fn leap_day_pairs_with_feb_28() {
        assert_eq!(
            prior_period_start(ymd(2024, 2, 29), Granularity::Day),
            Some(ymd(2023, 2, 28))
        );

        let ledger = ledger(&[(ymd(2023, 2, 28), dec!(50)), (ymd(2024, 2, 29), dec!(75))]);
        let day = ymd(2024, 2, 29);
        let series = paired_series(&ledger, DateRange::new(day, day), Granularity::Day);

        assert_eq!(series[0].prior_year_amount, Some(dec!(50)));
        assert_eq!(series[0].percent_change_vs_prior_year, Some(dec!(50)));
    }

    #[test]
    fn weeks_align_by_iso_week_number() {
        // 2024-01-01 is the Monday of 2024-W01; 2023-W01 starts on 2023-01-02.
        assert_eq!(
            prior_period_start(ymd(2024, 1, 1), Granularity::Week),
            Some(ymd(2023, 1, 2))
        );
    }

    #[test]
    fn quarter_and_month_step_back_a_year() {
        assert_eq!(
            prior_period_start(ymd(2024, 4, 1), Granularity::Quarter),
            Some(ymd(2023, 4, 1))
        );
        assert_eq!(
            prior_period_start(ymd(2024, 12, 1), Granularity::Month),
            Some(ymd(2023, 12, 1))
        );
    }

    #[test]
    fn prior_bucket_outside_range_is_recomputed_from_ledger() {
        let ledger = ledger(&[
            (ymd(2023, 3, 1), dec!(40)),
            (ymd(2023, 3, 30), dec!(60)),
            (ymd(2024, 3, 15), dec!(150)),
        ]);
        let series = paired_series(
            &ledger,
            DateRange::new(ymd(2024, 3, 1), ymd(2024, 3, 31)),
            Granularity::Month,
        );

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].prior_year_amount, Some(dec!(100)));
        assert_eq!(series[0].percent_change_vs_prior_year, Some(dec!(50)));
    }

    #[test]
    fn clipped_prior_bucket_uses_full_calendar_total() {
        // The range starts mid-month, so the in-series March 2023 point only
        // holds 60; the comparison must use the whole month (100).
        let ledger = ledger(&[
            (ymd(2023, 3, 1), dec!(40)),
            (ymd(2023, 3, 30), dec!(60)),
            (ymd(2024, 3, 15), dec!(110)),
        ]);
        let series = paired_series(
            &ledger,
            DateRange::new(ymd(2023, 3, 15), ymd(2024, 3, 31)),
            Granularity::Month,
        );

        assert_eq!(series[0].total_amount, dec!(60));
        let march_2024 = series.last().unwrap();
        assert_eq!(march_2024.label, "2024-03");
        assert_eq!(march_2024.prior_year_amount, Some(dec!(100)));
        assert_eq!(march_2024.percent_change_vs_prior_year, Some(dec!(10)));
    }

    #[test]
    fn missing_history_is_undefined_not_zero() {
        let ledger = ledger(&[(ymd(2024, 5, 10), dec!(10))]);
        let series = paired_series(
            &ledger,
            DateRange::new(ymd(2024, 5, 1), ymd(2024, 6, 30)),
            Granularity::Month,
        );
        assert!(series.iter().all(|p| p.prior_year_amount.is_none()));
        assert!(series.iter().all(|p| p.percent_change_vs_prior_year.is_none()));
    }

    #[test]
    fn empty_prior_bucket_with_history_is_zero_and_percent_undefined() {
        let ledger = ledger(&[(ymd(2023, 1, 10), dec!(5)), (ymd(2024, 2, 10), dec!(10))]);
        let series = paired_series(
            &ledger,
            DateRange::new(ymd(2024, 2, 1), ymd(2024, 2, 29)),
            Granularity::Month,
        );
        assert_eq!(series[0].prior_year_amount, Some(Decimal::ZERO));
        assert_eq!(series[0].percent_change_vs_prior_year, None);
    }
}
