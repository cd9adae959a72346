use crate::calendar::{next_period_start, period_label, period_start};
use crate::ledger::SalesLedger;
use chrono::{Days, NaiveDate};
use core_types::{DateRange, Granularity, GroupedPoint};
use rust_decimal::Decimal;

/// Groups validated sales records into contiguous calendar buckets.
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator {}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups the ledger into one point per bucket intersecting `range`.
    ///
    /// Buckets keep their calendar boundaries even when the range cuts through
    /// them; only records inside the range are counted. Buckets without records
    /// are emitted with a zero total so the series stays continuous. An inverted
    /// range yields an empty series.
    pub fn group(
        &self,
        ledger: &SalesLedger,
        range: DateRange,
        granularity: Granularity,
    ) -> Vec<GroupedPoint> {
        if range.is_inverted() {
            return Vec::new();
        }

        let in_range = ledger.between(range.start, range.end);
        let mut remaining = in_range.iter().peekable();
        let mut series = Vec::new();
        let mut start = period_start(range.start, granularity);

        while start <= range.end {
            let next = next_period_start(start, granularity);

            let mut total = Decimal::ZERO;
            while let Some(record) = remaining.next_if(|r| next.is_none_or(|end| r.date < end)) {
                total += record.amount;
            }

            // The last representable bucket has no successor; its end is clamped.
            let end = next.unwrap_or(NaiveDate::MAX);
            series.push(GroupedPoint::new(
                start,
                end,
                period_label(start, granularity),
                total,
            ));

            match next {
                Some(next_start) => start = next_start,
                None => break,
            }
        }

        tracing::debug!(
            granularity = %granularity,
            points = series.len(),
            records = in_range.len(),
            "Grouped sales series."
        );
        series
    }

    /// Total of the full calendar bucket starting at `start`, ignoring any display range.
    pub fn bucket_total(
        &self,
        ledger: &SalesLedger,
        start: NaiveDate,
        granularity: Granularity,
    ) -> Decimal {
        let last_day = next_period_start(start, granularity)
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .unwrap_or(NaiveDate::MAX);
        ledger.sum_between(start, last_day)
    }
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

    #[test]
    fn zero_fills_empty_months() {
        let ledger = ledger(&[
            (ymd(2023, 1, 15), dec!(10)),
            (ymd(2023, 3, 2), dec!(5)),
            (ymd(2023, 3, 31), dec!(7.5)),
        ]);
        let series = Aggregator::new().group(
            &ledger,
            DateRange::new(ymd(2023, 1, 1), ymd(2023, 4, 30)),
            Granularity::Month,
        );

        let totals: Vec<Decimal> = series.iter().map(|p| p.total_amount).collect();
        assert_eq!(totals, vec![dec!(10), dec!(0), dec!(12.5), dec!(0)]);
        assert_eq!(series[1].label, "2023-02");
        assert_eq!(series[1].period_start, ymd(2023, 2, 1));
        assert_eq!(series[1].period_end, ymd(2023, 3, 1));
    }

    #[test]
    fn edge_buckets_keep_calendar_bounds_but_count_only_in_range_records() {
        let ledger = ledger(&[
            (ymd(2023, 1, 3), dec!(100)), // before the range, same quarter
            (ymd(2023, 2, 10), dec!(20)),
            (ymd(2023, 4, 20), dec!(30)),
            (ymd(2023, 5, 20), dec!(40)), // after the range, same quarter
        ]);
        let series = Aggregator::new().group(
            &ledger,
            DateRange::new(ymd(2023, 2, 1), ymd(2023, 4, 30)),
            Granularity::Quarter,
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period_start, ymd(2023, 1, 1));
        assert_eq!(series[0].period_end, ymd(2023, 4, 1));
        assert_eq!(series[0].total_amount, dec!(20));
        assert_eq!(series[1].label, "2023-Q2");
        assert_eq!(series[1].total_amount, dec!(30));
    }

    #[test]
    fn inverted_range_is_empty() {
        let ledger = ledger(&[(ymd(2023, 1, 3), dec!(1))]);
        let series = Aggregator::new().group(
            &ledger,
            DateRange::new(ymd(2023, 2, 1), ymd(2023, 1, 1)),
            Granularity::Day,
        );
        assert!(series.is_empty());
    }

    #[test]
    fn single_day_range_yields_one_bucket() {
        let ledger = ledger(&[(ymd(2023, 6, 1), dec!(4)), (ymd(2023, 6, 1), dec!(6))]);
        let day = ymd(2023, 6, 1);
        let series = Aggregator::new().group(&ledger, DateRange::new(day, day), Granularity::Year);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "2023");
        assert_eq!(series[0].total_amount, dec!(10));
    }

    #[test]
    fn bucket_total_spans_the_full_calendar_bucket() {
        let ledger = ledger(&[
            (ymd(2023, 1, 2), dec!(1)),
            (ymd(2023, 1, 8), dec!(2)),
            (ymd(2023, 1, 9), dec!(4)),
        ]);
        let total = Aggregator::new().bucket_total(&ledger, ymd(2023, 1, 2), Granularity::Week);
        assert_eq!(total, dec!(3));
    }
}
