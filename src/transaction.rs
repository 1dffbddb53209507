//! Transaction parsing from raw CSV records.

use crate::amount::Amount;
use crate::record::RawRecord;
use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

/// Position of the `M/D` date field in a record.
pub const DATE_FIELD: usize = 1;

/// Position of the signed amount field in a record.
pub const AMOUNT_FIELD: usize = 2;

/// A parsed transaction with its year resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    /// Calendar date, year taken from the processing year
    pub date: NaiveDate,

    /// Signed amount; positive is a credit, zero or negative a debit
    pub amount: Amount,
}

impl ParsedTransaction {
    /// Parses a data record, resolving its year-less date against `year`.
    ///
    /// Returns `None` if the record has fewer than 3 fields or if its date or
    /// amount does not parse.
    pub fn from_record(record: &RawRecord, year: i32) -> Option<Self> {
        if record.len() <= AMOUNT_FIELD {
            return None;
        }
        let date = parse_month_day(record.get(DATE_FIELD)?, year)?;
        let amount = Amount::from_str(record.get(AMOUNT_FIELD)?).ok()?;
        Some(ParsedTransaction { date, amount })
    }

    /// Period bucket key, `YYYY-MM`.
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.date.year(), self.date.month())
    }

    /// Full date key used for persistence, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Parses a `M/D` date and places it in `year`.
///
/// Month and day are one or two digits each. Any day that exists in a leap
/// year is accepted, so `2/29` resolves to March 1 in common years.
fn parse_month_day(s: &str, year: i32) -> Option<NaiveDate> {
    let (month, day) = s.trim().split_once('/')?;
    let month = parse_small_number(month)?;
    let day = parse_small_number(day)?;

    if !(1..=12).contains(&month) || day == 0 || day > days_in_leap_year_month(month) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        // Feb 29 outside a leap year
        NaiveDate::from_ymd_opt(year, 3, 1)
    })
}

fn parse_small_number(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn days_in_leap_year_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
