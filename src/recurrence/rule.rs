use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

use crate::ledger::{Frequency, Weekdays};

/// Failures raised while building or parsing a recurrence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("interval must be at least 1, got {0}")]
    InvalidInterval(u32),
    #[error("rule is missing FREQ")]
    MissingFrequency,
    #[error("unknown FREQ `{0}`")]
    UnknownFrequency(String),
    #[error("unsupported rule part `{0}`")]
    Unsupported(String),
    #[error("invalid value `{value}` for {part}")]
    InvalidValue { part: String, value: String },
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("unrecognized line `{0}`")]
    UnknownLine(String),
}

/// A weekday with an ordinal, e.g. `-1FR` for the last Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthWeekday {
    /// Non-zero; negative values count back from the end of the month or year.
    pub nth: i32,
    pub weekday: Weekday,
}

impl NthWeekday {
    pub fn new(nth: i32, weekday: Weekday) -> Self {
        Self { nth, weekday }
    }
}

/// A single repetition pattern without its anchor date.
///
/// Every `by_*` list left empty places no constraint. Negative day, ordinal
/// and position values count back from the end of their period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    /// Last date that may occur, inclusive.
    pub until: Option<NaiveDate>,
    /// Weekday restriction (daily) or expansion (weekly, monthly, yearly).
    pub by_weekday: Option<Weekdays>,
    /// Ordinal weekdays, counted within the month, or within the year for
    /// yearly rules without `by_month`.
    pub by_nth_weekday: Vec<NthWeekday>,
    pub by_month_day: Vec<i32>,
    pub by_year_day: Vec<i32>,
    /// Months 1 through 12.
    pub by_month: Vec<u32>,
    /// Picks occurrences by position within each period.
    pub by_set_pos: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Month,
    Year,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, interval: u32) -> Result<Self, RuleError> {
        if interval == 0 {
            return Err(RuleError::InvalidInterval(interval));
        }
        Ok(Self {
            frequency,
            interval,
            until: None,
            by_weekday: None,
            by_nth_weekday: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
        })
    }

    pub fn until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    pub fn by_weekday(mut self, weekdays: Weekdays) -> Self {
        self.by_weekday = Some(weekdays);
        self
    }

    pub fn by_nth_weekday(mut self, days: &[NthWeekday]) -> Self {
        self.by_nth_weekday = days.to_vec();
        self
    }

    pub fn by_month_day(mut self, days: &[i32]) -> Self {
        self.by_month_day = days.to_vec();
        self
    }

    pub fn by_year_day(mut self, days: &[i32]) -> Self {
        self.by_year_day = days.to_vec();
        self
    }

    pub fn by_month(mut self, months: &[u32]) -> Self {
        self.by_month = months.to_vec();
        self
    }

    pub fn by_set_pos(mut self, positions: &[i32]) -> Self {
        self.by_set_pos = positions.to_vec();
        self
    }

    /// Occurrences anchored at `start` that fall inside `[from, to]`, ascending.
    ///
    /// Each period (day, week, month or year, every `interval` of them) yields
    /// a candidate set; `by_set_pos` selects from the whole set before the
    /// window bounds are applied.
    pub fn between(&self, start: NaiveDate, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let limit = match self.until {
            Some(until) => to.min(until),
            None => to,
        };
        let lower = from.max(start);
        if lower > limit {
            return Vec::new();
        }
        let bounds = Bounds { lower, limit };

        let mut dates = Vec::new();
        let mut period = self.first_period(start, bounds.lower);
        while let Some(period_start) = self.period_start(start, period) {
            if period_start > bounds.limit {
                break;
            }
            let candidates = self.select_positions(self.candidates(start, period_start));
            dates.extend(candidates.into_iter().filter(|date| bounds.contains(*date)));
            period += 1;
        }
        dates
    }

    fn step(&self) -> i64 {
        self.interval.max(1) as i64
    }

    /// Index of the first period that can reach `lower`.
    fn first_period(&self, start: NaiveDate, lower: NaiveDate) -> i64 {
        let step = self.step();
        let distance = match self.frequency {
            Frequency::Daily => return ((lower - start).num_days() + step - 1).div_euclid(step),
            Frequency::Weekly => (week_start(lower) - week_start(start)).num_days() / 7,
            Frequency::Monthly => month_index(lower) - month_index(start),
            Frequency::Yearly => lower.year() as i64 - start.year() as i64,
        };
        distance.div_euclid(step).max(0)
    }

    fn period_start(&self, start: NaiveDate, period: i64) -> Option<NaiveDate> {
        let offset = period.checked_mul(self.step())?;
        match self.frequency {
            Frequency::Daily => add_days(start, offset),
            Frequency::Weekly => add_days(week_start(start), offset.checked_mul(7)?),
            Frequency::Monthly => month_from_index(month_index(start).checked_add(offset)?),
            Frequency::Yearly => {
                let year = i32::try_from(start.year() as i64 + offset).ok()?;
                NaiveDate::from_ymd_opt(year, 1, 1)
            }
        }
    }

    /// Every date the rule produces in the period beginning at `period_start`.
    fn candidates(&self, start: NaiveDate, period_start: NaiveDate) -> Vec<NaiveDate> {
        match self.frequency {
            Frequency::Daily => {
                if self.month_allows(period_start) && self.day_matches(period_start, Scope::Month) {
                    vec![period_start]
                } else {
                    Vec::new()
                }
            }
            Frequency::Weekly => {
                let mut weekdays: Vec<Weekday> = self
                    .by_weekday
                    .map(|mask| mask.days())
                    .unwrap_or_default();
                weekdays.extend(self.by_nth_weekday.iter().map(|nth| nth.weekday));
                if weekdays.is_empty() {
                    weekdays.push(start.weekday());
                }
                weekdays
                    .iter()
                    .filter_map(|day| add_days(period_start, day.num_days_from_monday() as i64))
                    .filter(|date| {
                        self.month_allows(*date)
                            && self.month_day_allows(*date)
                            && self.year_day_allows(*date)
                    })
                    .collect()
            }
            Frequency::Monthly => {
                if !self.month_allows(period_start) {
                    Vec::new()
                } else if !self.has_day_selectors() {
                    period_start.with_day(start.day()).into_iter().collect()
                } else {
                    days_of_month(period_start)
                        .filter(|date| self.day_matches(*date, Scope::Month))
                        .collect()
                }
            }
            Frequency::Yearly => self.yearly_candidates(start, period_start.year()),
        }
    }

    fn yearly_candidates(&self, start: NaiveDate, year: i32) -> Vec<NaiveDate> {
        let mut months = self.by_month.clone();
        months.sort_unstable();
        months.dedup();

        if !self.has_day_selectors() {
            if months.is_empty() {
                months.push(start.month());
            }
            return months
                .iter()
                .filter_map(|month| NaiveDate::from_ymd_opt(year, *month, start.day()))
                .collect();
        }
        if months.is_empty() {
            return days_of_year(year)
                .filter(|date| self.day_matches(*date, Scope::Year))
                .collect();
        }
        months
            .iter()
            .filter_map(|month| NaiveDate::from_ymd_opt(year, *month, 1))
            .flat_map(days_of_month)
            .filter(|date| self.day_matches(*date, Scope::Month))
            .collect()
    }

    fn has_day_selectors(&self) -> bool {
        self.by_weekday.is_some()
            || !self.by_nth_weekday.is_empty()
            || !self.by_month_day.is_empty()
            || !self.by_year_day.is_empty()
    }

    fn day_matches(&self, date: NaiveDate, scope: Scope) -> bool {
        self.month_day_allows(date) && self.year_day_allows(date) && self.weekday_allows(date, scope)
    }

    fn month_allows(&self, date: NaiveDate) -> bool {
        self.by_month.is_empty() || self.by_month.contains(&date.month())
    }

    fn month_day_allows(&self, date: NaiveDate) -> bool {
        let length = days_in_month(date.year(), date.month());
        self.by_month_day.is_empty()
            || self
                .by_month_day
                .iter()
                .any(|day| matches_position(*day, date.day(), length))
    }

    fn year_day_allows(&self, date: NaiveDate) -> bool {
        let length = days_in_year(date.year());
        self.by_year_day.is_empty()
            || self
                .by_year_day
                .iter()
                .any(|day| matches_position(*day, date.ordinal(), length))
    }

    fn weekday_allows(&self, date: NaiveDate, scope: Scope) -> bool {
        if self.by_weekday.is_none() && self.by_nth_weekday.is_empty() {
            return true;
        }
        let weekday = date.weekday();
        if self.by_weekday.is_some_and(|mask| mask.contains(weekday)) {
            return true;
        }
        let (index, length) = match scope {
            Scope::Month => (date.day(), days_in_month(date.year(), date.month())),
            Scope::Year => (date.ordinal(), days_in_year(date.year())),
        };
        let from_start = (index - 1) / 7 + 1;
        let from_end = (length - index) / 7 + 1;
        self.by_nth_weekday.iter().any(|nth| {
            nth.weekday == weekday
                && ((nth.nth > 0 && nth.nth as u32 == from_start)
                    || (nth.nth < 0 && nth.nth.unsigned_abs() == from_end))
        })
    }

    fn select_positions(&self, mut candidates: Vec<NaiveDate>) -> Vec<NaiveDate> {
        candidates.sort_unstable();
        candidates.dedup();
        if self.by_set_pos.is_empty() {
            return candidates;
        }
        let len = candidates.len() as i64;
        let mut selected: Vec<NaiveDate> = self
            .by_set_pos
            .iter()
            .filter_map(|pos| {
                let idx = match *pos as i64 {
                    p if p > 0 => p - 1,
                    p if p < 0 => len + p,
                    _ => return None,
                };
                usize::try_from(idx).ok().and_then(|idx| candidates.get(idx).copied())
            })
            .collect();
        selected.sort_unstable();
        selected.dedup();
        selected
    }
}

/// A recurrence anchored at a start date, plus explicit inclusions and exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecurrenceSet {
    /// Anchor of every rule; falls back to the requested window start.
    pub start: Option<NaiveDate>,
    pub rules: Vec<RecurrenceRule>,
    pub rdates: Vec<NaiveDate>,
    pub exdates: Vec<NaiveDate>,
}

impl RecurrenceSet {
    pub fn single(start: NaiveDate, rule: RecurrenceRule) -> Self {
        Self {
            start: Some(start),
            rules: vec![rule],
            rdates: Vec::new(),
            exdates: Vec::new(),
        }
    }

    /// Every occurrence in `[from, to]`, sorted and deduplicated.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        if from > to {
            return Vec::new();
        }
        let start = self.start.unwrap_or(from);
        let mut dates: Vec<NaiveDate> = self
            .rules
            .iter()
            .flat_map(|rule| rule.between(start, from, to))
            .collect();
        dates.extend(
            self.rdates
                .iter()
                .copied()
                .filter(|date| *date >= from && *date <= to),
        );
        dates.retain(|date| !self.exdates.contains(date));
        dates.sort();
        dates.dedup();
        dates
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    lower: NaiveDate,
    limit: NaiveDate,
}

impl Bounds {
    fn contains(&self, date: NaiveDate) -> bool {
        date >= self.lower && date <= self.limit
    }
}

// 1-based `index` within a period of `length`; negative `position` counts from the end.
fn matches_position(position: i32, index: u32, length: u32) -> bool {
    match position {
        p if p > 0 => p as u32 == index,
        p if p < 0 => length + 1 >= p.unsigned_abs() && length + 1 - p.unsigned_abs() == index,
        _ => false,
    }
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let delta = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(delta)
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

fn month_from_index(idx: i64) -> Option<NaiveDate> {
    let year = i32::try_from(idx.div_euclid(12)).ok()?;
    let month = idx.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn days_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|last| last.ordinal())
        .unwrap_or(365)
}

fn days_of_month(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let length = days_in_month(first.year(), first.month());
    (1..=length).filter_map(move |day| first.with_day(day))
}

fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |date| date.year() == year)
}
