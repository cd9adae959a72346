//! Calendar arithmetic for period buckets.
//!
//! Month arithmetic goes through chrono's `Months`, which clamps the day of the
//! month to the end of a shorter target month (Mar 31 - 1 month = Feb 28/29,
//! Feb 29 - 12 months = Feb 28).

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use core_types::Granularity;

/// The first day of the bucket containing `date`.
pub fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => week_start(date),
        Granularity::Month => first_of_month(date.year(), date.month(), date),
        Granularity::Quarter => {
            let quarter_month = (date.month0() / 3) * 3 + 1;
            first_of_month(date.year(), quarter_month, date)
        }
        Granularity::Year => first_of_month(date.year(), 1, date),
    }
}

/// The first day of the bucket following the one starting at `start`.
///
/// `None` only at the very end of chrono's representable range.
pub fn next_period_start(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => start.checked_add_days(Days::new(1)),
        Granularity::Week => start.checked_add_days(Days::new(7)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
        Granularity::Quarter => start.checked_add_months(Months::new(3)),
        Granularity::Year => start.checked_add_months(Months::new(12)),
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// The same calendar date one year earlier, with Feb 29 clamped to Feb 28.
pub fn one_year_earlier(date: NaiveDate) -> Option<NaiveDate> {
    months_earlier(date, 12)
}

/// `date` minus `months` calendar months, day-of-month clamped to the target month.
pub fn months_earlier(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

/// Monday of ISO week `week` in the ISO year before `iso_year`.
///
/// Week 53 falls back to week 52 when the earlier year has no week 53.
pub fn same_iso_week_prior_year(iso_year: i32, week: u32) -> Option<NaiveDate> {
    let prior_year = iso_year.checked_sub(1)?;
    NaiveDate::from_isoywd_opt(prior_year, week, Weekday::Mon)
        .or_else(|| NaiveDate::from_isoywd_opt(prior_year, week.min(52), Weekday::Mon))
}

/// The display label of the bucket starting at `start`.
pub fn period_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => start.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let iso = start.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Granularity::Month => start.format("%Y-%m").to_string(),
        Granularity::Quarter => format!("{}-Q{}", start.year(), start.month0() / 3 + 1),
        Granularity::Year => start.year().to_string(),
    }
}

// Day 1 always exists; the fallback keeps this total without an unwrap.
fn first_of_month(year: i32, month: u32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(fallback)
}
