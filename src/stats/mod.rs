//! Averages extrapolated from a finished projection.

use serde::{Deserialize, Serialize};

use crate::currency::format_as_currency;
use crate::projection::ProjectionRow;

const MONTHS_PER_YEAR: f64 = 12.0;
const DAYS_PER_YEAR: f64 = 365.0;
/// Calendar-average year length used by the standalone rate helpers.
const DAYS_PER_CALENDAR_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub daily_spending: i64,
    pub daily_income: i64,
    pub daily_net: i64,
    pub monthly_spending: i64,
    pub monthly_income: i64,
    pub monthly_net: i64,
    pub yearly_spending: i64,
    pub yearly_income: i64,
    pub yearly_net: i64,
}

impl SummaryStats {
    /// Human readable summary, one figure per line.
    pub fn report(&self) -> String {
        format!(
            "Here are some statistics about your finances.\n\n\
             Daily spending: {}\n\
             Daily income: {}\n\
             Daily net: {}\n\
             Monthly spending: {}\n\
             Monthly income: {}\n\
             Monthly net: {}\n\
             Yearly spending: {}\n\
             Yearly income: {}\n\
             Yearly net: {}",
            format_as_currency(self.daily_spending),
            format_as_currency(self.daily_income),
            format_as_currency(self.daily_net),
            format_as_currency(self.monthly_spending),
            format_as_currency(self.monthly_income),
            format_as_currency(self.monthly_net),
            format_as_currency(self.yearly_spending),
            format_as_currency(self.yearly_income),
            format_as_currency(self.yearly_net),
        )
    }
}

/// Extrapolates daily, monthly and yearly figures from the last row's
/// cumulative totals.
///
/// Each period divides the same total by its own fixed divisor (`count`,
/// `count / 12`, `count / 365`), so the periods do not scale into one another.
/// Fewer than two rows yields all zeros.
pub fn compute_stats(rows: &[ProjectionRow]) -> SummaryStats {
    let Some(last) = rows.last().filter(|_| rows.len() >= 2) else {
        return SummaryStats::default();
    };
    let days = rows.len() as f64;
    let months = days / MONTHS_PER_YEAR;
    let years = days / DAYS_PER_YEAR;

    let spending = last.cumulative_expenses as f64;
    let income = last.cumulative_income as f64;

    let daily_spending = round_div(spending, days);
    let daily_income = round_div(income, days);
    let monthly_spending = round_div(spending, months);
    let monthly_income = round_div(income, months);
    let yearly_spending = round_div(spending, years);
    let yearly_income = round_div(income, years);

    SummaryStats {
        daily_spending,
        daily_income,
        daily_net: daily_spending + daily_income,
        monthly_spending,
        monthly_income,
        monthly_net: monthly_spending + monthly_income,
        yearly_spending,
        yearly_income,
        yearly_net: yearly_spending + yearly_income,
    }
}

/// Average amount per calendar month for `amount` accumulated over `days`.
pub fn monthly_rate(amount: i64, days: u32) -> i64 {
    round_div(
        amount as f64,
        f64::from(days) / (DAYS_PER_CALENDAR_YEAR / MONTHS_PER_YEAR),
    )
}

/// Average amount per calendar year for `amount` accumulated over `days`.
pub fn yearly_rate(amount: i64, days: u32) -> i64 {
    round_div(amount as f64, f64::from(days) / DAYS_PER_CALENDAR_YEAR)
}

pub fn daily_rate(amount: i64, days: u32) -> i64 {
    round_div(amount as f64, f64::from(days))
}

/// Compact listing such as `"(3) Rent; Gym; Phone; "`; empty input gives `""`.
pub fn summarize_names<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let mut summary = format!("({}) ", names.len());
    for name in names {
        summary.push_str(name.as_ref());
        summary.push_str("; ");
    }
    summary
}

// f64::round rounds half away from zero. A zero divisor yields zero.
fn round_div(total: f64, divisor: f64) -> i64 {
    if divisor == 0.0 {
        return 0;
    }
    (total / divisor).round() as i64
}
