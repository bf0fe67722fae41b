use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::dates::format_date_string;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Structured repetition unit of a definition.
///
/// Stored as its upper-case label; any label that is not recognized reads
/// back as [`Frequency::Daily`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            _ => Frequency::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Frequency::from_label(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekday inclusion flags, Monday = 0 through Sunday = 6.
///
/// Serialized as an integer-keyed map; keys outside `0..=6` are dropped on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<i32, bool>", into = "BTreeMap<i32, bool>")]
pub struct Weekdays([bool; 7]);

impl Weekdays {
    pub fn none() -> Self {
        Self([false; 7])
    }

    pub fn all() -> Self {
        Self([true; 7])
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        let mut flags = Self::none();
        for day in days {
            flags.set(*day, true);
        }
        flags
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, included: bool) {
        self.0[day.num_days_from_monday() as usize] = included;
    }

    pub fn toggle(&mut self, day: Weekday) {
        let idx = day.num_days_from_monday() as usize;
        self.0[idx] = !self.0[idx];
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|flag| *flag)
    }

    /// Included weekdays in Monday-first order.
    pub fn days(&self) -> Vec<Weekday> {
        WEEKDAYS
            .iter()
            .copied()
            .filter(|day| self.contains(*day))
            .collect()
    }

    /// One glyph per weekday, Monday first, for table cells.
    pub fn marks<'a>(&self, checked: &'a str, unchecked: &'a str) -> [&'a str; 7] {
        let mut marks = [unchecked; 7];
        for (mark, included) in marks.iter_mut().zip(self.0) {
            if included {
                *mark = checked;
            }
        }
        marks
    }
}

impl From<BTreeMap<i32, bool>> for Weekdays {
    fn from(map: BTreeMap<i32, bool>) -> Self {
        let mut flags = Self::none();
        for (key, included) in map {
            if let Some(slot) = usize::try_from(key).ok().and_then(|idx| flags.0.get_mut(idx)) {
                *slot = included;
            }
        }
        flags
    }
}

impl From<Weekdays> for BTreeMap<i32, bool> {
    fn from(flags: Weekdays) -> Self {
        flags
            .0
            .iter()
            .enumerate()
            .map(|(idx, included)| (idx as i32, *included))
            .collect()
    }
}

/// A year/month/day triple as entered by the user.
///
/// The all-zero value means "unset"; other values are not validated until a
/// recurrence is built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarDate {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

impl CalendarDate {
    pub const UNSET: CalendarDate = CalendarDate {
        year: 0,
        month: 0,
        day: 0,
    };

    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_date_string(self.year, self.month, self.day))
    }
}
