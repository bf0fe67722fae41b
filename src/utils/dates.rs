//! `YYYY-MM-DD` helpers shared by definitions, windows and exports.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::errors::{ProjectionError, ProjectionResult};

/// Date strings that mean "no date chosen".
const UNSET_DATE_STRINGS: [&str; 3] = ["0-0-0", "--", ""];

/// Formats a calendar date as zero-padded `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    format_date_string(date.year(), date.month(), date.day())
}

/// Formats raw components as zero-padded `YYYY-MM-DD` without validating them.
pub fn format_date_string(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Returns the `YYYY-MM-DD` string one year after the given instant.
pub fn default_end_date_string(now: DateTime<Utc>) -> String {
    format_date(one_year_after(now.date_naive()))
}

/// Splits `YYYY-MM-DD` into its components.
///
/// Anything that does not have exactly three `-`-separated parts yields
/// `(0, 0, 0)`; individual parts that fail to parse become `0`. Callers treat
/// an all-zero result as unset.
pub fn parse_date_string(input: &str) -> (i32, u32, u32) {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 3 {
        return (0, 0, 0);
    }
    let year = parts[0].trim().parse::<i32>().unwrap_or(0);
    let month = parts[1].trim().parse::<u32>().unwrap_or(0);
    let day = parts[2].trim().parse::<u32>().unwrap_or(0);
    (year, month, day)
}

pub fn is_unset_date_string(input: &str) -> bool {
    UNSET_DATE_STRINGS.contains(&input.trim())
}

/// Same month and day one year later. Feb 29 rolls over to Mar 1.
pub fn one_year_after(date: NaiveDate) -> NaiveDate {
    let year = date.year() + 1;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| {
            NaiveDate::from_ymd_opt(year, date.month(), 1)
                .map(|first| first + Duration::days(date.day() as i64 - 1))
        })
        .unwrap_or(date)
}

/// Resolves a window boundary string.
///
/// Unset sentinels and strings that parse to all zeros fall back to
/// `fallback`; anything else must be a real calendar date.
pub fn resolve_date_string(input: &str, fallback: NaiveDate) -> ProjectionResult<NaiveDate> {
    if is_unset_date_string(input) {
        return Ok(fallback);
    }
    match parse_date_string(input) {
        (0, 0, 0) => Ok(fallback),
        (year, month, day) => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ProjectionError::InvalidDate(input.to_string())),
    }
}

/// Resolves both window boundaries: start defaults to `today`, end to a year later.
pub fn resolve_window_strings(
    start: &str,
    end: &str,
    today: NaiveDate,
) -> ProjectionResult<(NaiveDate, NaiveDate)> {
    let start = resolve_date_string(start, today)?;
    let end = resolve_date_string(end, one_year_after(today))?;
    Ok((start, end))
}
