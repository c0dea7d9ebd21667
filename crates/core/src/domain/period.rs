// Billing period helpers (`MM-YYYY` month granularity)

use chrono::{Datelike, NaiveDate};

use super::error::{DomainError, Result};

/// Parse a `MM-YYYY` string into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    let invalid = || {
        DomainError::InvalidSubscription(format!("invalid month '{}', expected MM-YYYY", value))
    };

    let (month, year) = value.split_once('-').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 4 {
        return Err(invalid());
    }
    if !month.chars().chain(year.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Format a date as `MM-YYYY`.
pub fn format_month(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}

/// Normalize any date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
