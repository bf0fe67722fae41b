#![allow(dead_code)]

use chrono::NaiveDate;
use finance_planner::{CalendarDate, Frequency, TransactionDefinition, Weekdays};

pub const NAME: &str = "Foo";
pub const AMOUNT: i64 = -10000;
pub const STARTING_BALANCE: i64 = 10000;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn window() -> (NaiveDate, NaiveDate) {
    (date(2020, 1, 1), date(2026, 2, 2))
}

/// Monthly definition starting 2024-01-01 with no end.
pub fn monthly(amount: i64) -> TransactionDefinition {
    let mut definition = TransactionDefinition::new()
        .with_name(NAME)
        .with_amount(amount);
    definition.frequency = Frequency::Monthly;
    definition.interval = 1;
    definition.starts = CalendarDate::new(2024, 1, 1);
    definition.ends = CalendarDate::UNSET;
    definition.weekdays = Weekdays::none();
    definition
}
