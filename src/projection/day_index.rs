use chrono::NaiveDate;

use super::{DateWindow, PROGRESS_INTERVAL};
use crate::errors::ProjectionResult;
use crate::ledger::TransactionDefinition;
use crate::recurrence::resolve;

/// Same-day contributions collected before a row is finalized.
///
/// `amounts` and `names` are parallel; [`DayBucket::push`] is the only writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DayBucket {
    pub(crate) date: NaiveDate,
    pub(crate) amounts: Vec<i64>,
    pub(crate) names: Vec<String>,
}

impl DayBucket {
    pub(crate) fn new(date: NaiveDate) -> Self {
        Self {
            date,
            amounts: Vec::new(),
            names: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, amount: i64, name: &str) {
        self.amounts.push(amount);
        self.names.push(name.to_string());
    }
}

/// One empty bucket per calendar day of `window`, ascending; index = day offset.
pub(crate) fn build_day_index(window: DateWindow) -> Vec<DayBucket> {
    window.start.iter_days().take(window.days()).map(DayBucket::new).collect()
}

/// Appends every occurrence of every active definition to its day's bucket,
/// in definition order.
pub(crate) fn merge_occurrences(
    buckets: &mut [DayBucket],
    definitions: &[TransactionDefinition],
    window: DateWindow,
    progress: &mut dyn FnMut(&str),
) -> ProjectionResult<()> {
    let total = definitions.len();
    progress(&format!("recurrences... [0/{}]", total));

    for (i, definition) in definitions.iter().enumerate() {
        if !definition.active {
            continue;
        }
        if i % PROGRESS_INTERVAL == 0 {
            progress(&format!("recurrences... [{}/{}]", i + 1, total));
        }

        let occurrences = resolve(definition, window)?;
        tracing::debug!(
            name = %definition.name,
            occurrences = occurrences.len(),
            "expanded definition"
        );
        for date in occurrences {
            let offset = (date - window.start).num_days();
            let bucket = usize::try_from(offset)
                .ok()
                .and_then(|idx| buckets.get_mut(idx))
                .filter(|bucket| bucket.date == date);
            match bucket {
                Some(bucket) => bucket.push(definition.amount, &definition.name),
                None => tracing::warn!(%date, name = %definition.name, "occurrence outside day index"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CalendarDate, Frequency};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_index_is_gap_free_and_inclusive() {
        let window = DateWindow::new(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
        let dates: Vec<_> = build_day_index(window).iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1),
                date(2024, 3, 2)
            ]
        );
    }

    #[test]
    fn single_day_window_has_one_bucket() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(build_day_index(window).len(), 1);
    }

    #[test]
    fn merge_keeps_definition_order_within_a_day() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        let mut buckets = build_day_index(window);
        let definitions: Vec<_> = [("Coffee", -300), ("Paycheck", 200000), ("Rent", -150000)]
            .iter()
            .map(|(name, amount)| {
                let mut definition = TransactionDefinition::new()
                    .with_name(*name)
                    .with_amount(*amount);
                definition.frequency = Frequency::Monthly;
                definition.starts = CalendarDate::new(2024, 1, 2);
                definition.ends = CalendarDate::UNSET;
                definition
            })
            .collect();

        let mut messages = Vec::new();
        merge_occurrences(&mut buckets, &definitions, window, &mut |m: &str| {
            messages.push(m.to_string())
        })
        .unwrap();

        assert!(buckets[0].amounts.is_empty());
        assert_eq!(buckets[1].amounts, vec![-300, 200000, -150000]);
        assert_eq!(buckets[1].names, vec!["Coffee", "Paycheck", "Rent"]);
        assert!(buckets[2].names.is_empty());
        assert_eq!(messages, vec!["recurrences... [0/3]", "recurrences... [1/3]"]);
    }
}
