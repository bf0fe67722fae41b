//! Turns a definition into concrete occurrence dates inside a window.

pub mod parse;
pub mod rule;

use chrono::NaiveDate;

pub use rule::{RecurrenceRule, RecurrenceSet, RuleError};

use crate::errors::{ProjectionError, ProjectionResult};
use crate::ledger::{CalendarDate, Frequency, TransactionDefinition, Weekdays};
use crate::projection::DateWindow;

/// How a definition describes its schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceSource<'a> {
    /// Raw rule text; structured fields are ignored.
    Raw(&'a str),
    Structured(StructuredRecurrence),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredRecurrence {
    pub frequency: Frequency,
    pub interval: u32,
    pub starts: CalendarDate,
    pub ends: CalendarDate,
    pub weekdays: Weekdays,
}

impl<'a> RecurrenceSource<'a> {
    pub fn of(definition: &'a TransactionDefinition) -> Self {
        let raw = definition.rrule.trim();
        if raw.is_empty() {
            RecurrenceSource::Structured(StructuredRecurrence {
                frequency: definition.frequency,
                interval: definition.interval,
                starts: definition.starts,
                ends: definition.ends,
                weekdays: definition.weekdays,
            })
        } else {
            RecurrenceSource::Raw(raw)
        }
    }

    /// Builds the rule set this source describes, bounded by `window`.
    pub fn build(&self, window: DateWindow) -> Result<RecurrenceSet, RuleError> {
        match self {
            RecurrenceSource::Raw(text) => text.parse(),
            RecurrenceSource::Structured(structured) => structured.build(window),
        }
    }
}

impl StructuredRecurrence {
    fn build(&self, window: DateWindow) -> Result<RecurrenceSet, RuleError> {
        let start = if self.starts.is_unset() {
            window.start
        } else {
            self.starts
                .to_date()
                .ok_or_else(|| RuleError::InvalidDate(self.starts.to_string()))?
        };
        let end = if self.ends.is_unset() {
            window.end
        } else {
            let end = self
                .ends
                .to_date()
                .ok_or_else(|| RuleError::InvalidDate(self.ends.to_string()))?;
            end.min(window.end)
        };

        // An interval of zero repeats like an interval of one.
        let mut rule = RecurrenceRule::new(self.frequency, self.interval.max(1))?.until(end);
        match self.frequency {
            Frequency::Daily => rule = rule.by_weekday(self.weekdays),
            Frequency::Weekly if !self.weekdays.is_empty() => {
                rule = rule.by_weekday(self.weekdays)
            }
            _ => {}
        }
        Ok(RecurrenceSet::single(start, rule))
    }
}

/// Occurrence dates of `definition` within `window`, ascending and inclusive.
///
/// Inactive definitions produce nothing. Build failures are reported with the
/// definition's name.
pub fn resolve(
    definition: &TransactionDefinition,
    window: DateWindow,
) -> ProjectionResult<Vec<NaiveDate>> {
    if !definition.active {
        return Ok(Vec::new());
    }
    let source = RecurrenceSource::of(definition);
    if let RecurrenceSource::Structured(structured) = &source {
        if structured.frequency == Frequency::Daily && structured.weekdays.is_empty() {
            tracing::warn!(
                name = %definition.name,
                "daily definition has no weekdays selected and will never occur"
            );
        }
    }
    let set = source
        .build(window)
        .map_err(|err| ProjectionError::recurrence(&definition.name, err.to_string()))?;
    Ok(set.between(window.start, window.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> DateWindow {
        DateWindow::new(date(2024, 1, 1), date(2024, 3, 31)).unwrap()
    }

    fn monthly(name: &str) -> TransactionDefinition {
        let mut definition = TransactionDefinition::new().with_name(name);
        definition.frequency = Frequency::Monthly;
        definition.starts = CalendarDate::new(2024, 1, 10);
        definition.ends = CalendarDate::UNSET;
        definition
    }

    #[test]
    fn raw_rule_takes_precedence_over_structured_fields() {
        let definition =
            monthly("Rent").with_rrule("DTSTART:20240105\nRRULE:FREQ=MONTHLY;INTERVAL=2");
        assert!(matches!(
            RecurrenceSource::of(&definition),
            RecurrenceSource::Raw(_)
        ));
        assert_eq!(
            resolve(&definition, window()).unwrap(),
            vec![date(2024, 1, 5), date(2024, 3, 5)]
        );
    }

    #[test]
    fn structured_end_is_clamped_to_window() {
        let mut definition = monthly("Gym");
        definition.ends = CalendarDate::new(2030, 1, 1);
        assert_eq!(
            resolve(&definition, window()).unwrap(),
            vec![date(2024, 1, 10), date(2024, 2, 10), date(2024, 3, 10)]
        );
    }

    #[test]
    fn unset_start_anchors_at_window_start() {
        let mut definition = monthly("Phone");
        definition.starts = CalendarDate::UNSET;
        assert_eq!(
            resolve(&definition, window()).unwrap(),
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn monthly_ignores_weekday_mask() {
        let mut definition = monthly("Insurance");
        definition.weekdays = Weekdays::all();
        assert_eq!(resolve(&definition, window()).unwrap().len(), 3);
    }

    #[test]
    fn daily_mask_restricts_days() {
        let mut definition = monthly("Lunch");
        definition.frequency = Frequency::Daily;
        definition.starts = CalendarDate::new(2024, 1, 1);
        definition.ends = CalendarDate::new(2024, 1, 7);
        definition.weekdays = Weekdays::from_days(&[Weekday::Mon, Weekday::Wed]);
        assert_eq!(
            resolve(&definition, window()).unwrap(),
            vec![date(2024, 1, 1), date(2024, 1, 3)]
        );

        definition.weekdays = Weekdays::none();
        assert!(resolve(&definition, window()).unwrap().is_empty());
    }

    #[test]
    fn inactive_and_out_of_range_definitions_yield_nothing() {
        let mut inactive = monthly("Paused");
        inactive.active = false;
        inactive.rrule = "not a rule".into();
        assert!(resolve(&inactive, window()).unwrap().is_empty());

        let mut inverted = monthly("Inverted");
        inverted.starts = CalendarDate::new(2024, 3, 1);
        inverted.ends = CalendarDate::new(2024, 2, 1);
        assert!(resolve(&inverted, window()).unwrap().is_empty());

        let mut later = monthly("Later");
        later.starts = CalendarDate::new(2025, 1, 1);
        assert!(resolve(&later, window()).unwrap().is_empty());
    }

    #[test]
    fn construction_failures_name_the_definition() {
        let broken = monthly("Broken").with_rrule("RRULE:FREQ=SOMETIMES");
        let err = resolve(&broken, window()).unwrap_err();
        assert!(
            matches!(&err, ProjectionError::RecurrenceParse { name, .. } if name == "Broken"),
            "unexpected error: {err}"
        );

        let mut bad_date = monthly("Bad date");
        bad_date.starts = CalendarDate::new(2024, 2, 30);
        assert!(matches!(
            resolve(&bad_date, window()),
            Err(ProjectionError::RecurrenceParse { .. })
        ));

        let mut partial = monthly("Partial");
        partial.ends = CalendarDate::new(2024, 0, 0);
        let err = resolve(&partial, window()).unwrap_err();
        assert!(
            matches!(&err, ProjectionError::RecurrenceParse { name, reason }
                if name == "Partial" && reason.contains("2024")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn zero_interval_repeats_every_period() {
        let mut zero_interval = monthly("Zero");
        zero_interval.starts = CalendarDate::new(2024, 1, 1);
        zero_interval.interval = 0;
        let year = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        let dates = resolve(&zero_interval, year).unwrap();
        assert_eq!(dates.len(), 12);
        assert_eq!(dates.last(), Some(&date(2024, 12, 1)));
    }
}
