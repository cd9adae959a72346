use chrono::NaiveDate;
use core_types::{CoreError, RawSalesRecord, SalesRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw record that was excluded from every computation, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// Position of the record in the input sequence.
    pub index: usize,
    pub reason: CoreError,
}

/// The validated, date-sorted view of the raw record store for one recompute.
///
/// Building the ledger is the only place raw input is inspected. Invalid records
/// are set aside as `RejectedRecord`s rather than failing the build.
///
/// Invariant: the absolute amounts of all kept records sum to at most
/// `Decimal::MAX`. Every total derived from the ledger (bucket totals, window
/// sums, differences between two totals) is therefore bounded by that sum and
/// cannot overflow.
#[derive(Debug, Clone, Default)]
pub struct SalesLedger {
    records: Vec<SalesRecord>,
    rejected: Vec<RejectedRecord>,
}

impl SalesLedger {
    pub fn from_raw(raw: &[RawSalesRecord]) -> Self {
        let mut valid = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (index, record) in raw.iter().enumerate() {
            match record.validate() {
                Ok(record) => valid.push((index, record)),
                Err(reason) => reject(&mut rejected, index, reason),
            }
        }

        Self::build(valid, rejected)
    }

    /// Builds a ledger from records that are already validated.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self::build(records.into_iter().enumerate().collect(), Vec::new())
    }

    fn build(mut valid: Vec<(usize, SalesRecord)>, mut rejected: Vec<RejectedRecord>) -> Self {
        // Stable sort keeps input order among same-day records.
        valid.sort_by_key(|(_, r)| r.date);

        let mut magnitude = Decimal::ZERO;
        let mut records = Vec::with_capacity(valid.len());
        for (index, record) in valid {
            match magnitude.checked_add(record.amount.abs()) {
                Some(total) => {
                    magnitude = total;
                    records.push(record);
                }
                None => reject(&mut rejected, index, CoreError::TotalOverflow(record.amount)),
            }
        }

        rejected.sort_by_key(|r| r.index);
        Self { records, rejected }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// The records dated within `[first, last]`, in date order.
    pub fn between(&self, first: NaiveDate, last: NaiveDate) -> &[SalesRecord] {
        if first > last {
            return &[];
        }
        let lo = self.records.partition_point(|r| r.date < first);
        let hi = self.records.partition_point(|r| r.date <= last);
        &self.records[lo..hi]
    }

    /// Sum of amounts dated within `[first, last]`.
    pub fn sum_between(&self, first: NaiveDate, last: NaiveDate) -> Decimal {
        self.between(first, last).iter().map(|r| r.amount).sum()
    }

    /// Whether the store holds any record dated on or before `date`.
    pub fn reaches_back_to(&self, date: NaiveDate) -> bool {
        self.first_date().is_some_and(|first| first <= date)
    }
}

fn reject(rejected: &mut Vec<RejectedRecord>, index: usize, reason: CoreError) {
    tracing::warn!(index, error = %reason, "Excluding malformed sales record.");
    rejected.push(RejectedRecord { index, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_raw_sorts_and_sets_aside_bad_records() {
        let raw = vec![
            RawSalesRecord::new("2023-03-05", 30.0),
            RawSalesRecord::new("not-a-date", 10.0),
            RawSalesRecord::new("2023-01-05", 10.0),
            RawSalesRecord::new("2023-02-05", f64::NAN),
        ];
        let ledger = SalesLedger::from_raw(&raw);

        assert_eq!(ledger.records().len(), 2);
        assert_eq!(ledger.first_date(), Some(ymd(2023, 1, 5)));
        assert_eq!(ledger.last_date(), Some(ymd(2023, 3, 5)));

        let indices: Vec<usize> = ledger.rejected().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(
            ledger.rejected()[0].reason,
            CoreError::InvalidDate("not-a-date".to_string())
        );
        assert_eq!(ledger.rejected()[1].reason, CoreError::NonFiniteAmount);
    }

    #[test]
    fn mistyped_rows_in_a_batch_only_drop_themselves() {
        let json = r#"[
            {"date":"2023-01-01","amount":10.0},
            {"date":"2023-01-02","amount":"12.50"},
            {"date":"2023-01-03","amount":{"value":3}},
            {"date":1672704000,"amount":4.0},
            {"date":"2023-01-05","amount":"7"}
        ]"#;
        let raw: Vec<RawSalesRecord> = serde_json::from_str(json).unwrap();
        let ledger = SalesLedger::from_raw(&raw);

        assert_eq!(ledger.records().len(), 3);
        assert_eq!(ledger.sum_between(ymd(2023, 1, 1), ymd(2023, 1, 31)), dec!(29.50));
        let indices: Vec<usize> = ledger.rejected().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 3]);
        assert!(matches!(ledger.rejected()[0].reason, CoreError::InvalidAmount(_)));
        assert!(matches!(ledger.rejected()[1].reason, CoreError::InvalidDate(_)));
    }

    #[test]
    fn amounts_that_would_overflow_the_total_are_rejected() {
        let raw = vec![
            RawSalesRecord::new("2023-01-02", 5e28),
            RawSalesRecord::new("2023-01-01", 5e28),
            RawSalesRecord::new("2023-01-03", -1.0),
        ];
        let ledger = SalesLedger::from_raw(&raw);

        // The earlier-dated record is kept; the later one would push the total past MAX.
        assert_eq!(ledger.records().len(), 2);
        assert_eq!(ledger.first_date(), Some(ymd(2023, 1, 1)));
        assert_eq!(ledger.rejected().len(), 1);
        assert_eq!(ledger.rejected()[0].index, 0);
        assert!(matches!(ledger.rejected()[0].reason, CoreError::TotalOverflow(_)));
    }

    #[test]
    fn sum_between_is_inclusive() {
        let ledger = SalesLedger::from_records(vec![
            SalesRecord::new(ymd(2023, 1, 1), dec!(1.10)),
            SalesRecord::new(ymd(2023, 1, 2), dec!(2.20)),
            SalesRecord::new(ymd(2023, 1, 3), dec!(3.30)),
        ]);
        assert_eq!(ledger.sum_between(ymd(2023, 1, 1), ymd(2023, 1, 2)), dec!(3.30));
        assert_eq!(ledger.sum_between(ymd(2023, 1, 2), ymd(2023, 1, 9)), dec!(5.50));
        assert_eq!(ledger.sum_between(ymd(2023, 1, 3), ymd(2023, 1, 1)), Decimal::ZERO);
        assert!(ledger.reaches_back_to(ymd(2023, 1, 1)));
        assert!(!ledger.reaches_back_to(ymd(2022, 12, 31)));
    }
}
