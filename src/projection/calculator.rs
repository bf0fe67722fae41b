use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::day_index::DayBucket;
use super::PROGRESS_INTERVAL;
use crate::errors::{ProjectionError, ProjectionResult};

/// Balance snapshot at the end of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Zero-based position in the projection.
    pub record: usize,
    pub date: NaiveDate,
    pub balance: i64,
    pub cumulative_income: i64,
    pub cumulative_expenses: i64,
    pub day_expenses: i64,
    pub day_income: i64,
    pub day_net: i64,
    /// Names of the day's contributions joined with `"; "`.
    pub day_transaction_names: String,
    pub day_transaction_names_list: Vec<String>,
    /// Running balance minus the starting balance.
    pub diff_from_start: i64,
}

#[derive(Debug, Default)]
struct Totals {
    balance: i64,
    income: i64,
    expenses: i64,
    diff: i64,
}

/// Walks the buckets once, producing one row per day.
///
/// Totals that leave the `i64` range fail with [`ProjectionError::Overflow`].
///
/// Buckets are stable sorted by date first, so same-day contributions keep
/// their insertion order.
pub(crate) fn calculate(
    buckets: &mut [DayBucket],
    starting_balance: i64,
    progress: &mut dyn FnMut(&str),
) -> ProjectionResult<Vec<ProjectionRow>> {
    buckets.sort_by_key(|bucket| bucket.date);

    let total = buckets.len();
    progress(&format!("calculating... [0/{}]", total));

    let mut totals = Totals {
        balance: starting_balance,
        ..Totals::default()
    };
    let mut rows = Vec::with_capacity(total);

    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.amounts.len() != bucket.names.len() {
            return Err(ProjectionError::InternalConsistency {
                date: bucket.date,
                amounts: bucket.amounts.len(),
                names: bucket.names.len(),
            });
        }
        if i % PROGRESS_INTERVAL == 0 {
            progress(&format!("calculating... [{}/{}]", i + 1, total));
        }

        let overflow = || ProjectionError::Overflow { date: bucket.date };
        let mut day_income: i64 = 0;
        let mut day_expenses: i64 = 0;
        for &amount in &bucket.amounts {
            if amount >= 0 {
                day_income = day_income.checked_add(amount).ok_or_else(overflow)?;
                totals.income = totals.income.checked_add(amount).ok_or_else(overflow)?;
            } else {
                day_expenses = day_expenses.checked_add(amount).ok_or_else(overflow)?;
                totals.expenses = totals.expenses.checked_add(amount).ok_or_else(overflow)?;
            }
            totals.balance = totals.balance.checked_add(amount).ok_or_else(overflow)?;
            totals.diff = totals.diff.checked_add(amount).ok_or_else(overflow)?;
        }
        let day_net = day_income.checked_add(day_expenses).ok_or_else(overflow)?;

        rows.push(ProjectionRow {
            record: i,
            date: bucket.date,
            balance: totals.balance,
            cumulative_income: totals.income,
            cumulative_expenses: totals.expenses,
            day_expenses,
            day_income,
            day_net,
            day_transaction_names: bucket.names.join("; "),
            day_transaction_names_list: bucket.names.clone(),
            diff_from_start: totals.diff,
        });
    }

    progress(&format!("done [{}/{}]", total, total));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bucket(day: u32, entries: &[(i64, &str)]) -> DayBucket {
        let mut bucket = DayBucket::new(date(2024, 1, day));
        for (amount, name) in entries {
            bucket.push(*amount, name);
        }
        bucket
    }

    #[test]
    fn splits_income_and_expenses_per_day() {
        let mut buckets = vec![
            bucket(1, &[(-500, "Coffee"), (1000, "Refund"), (0, "Zero")]),
            bucket(2, &[]),
            bucket(3, &[(-250, "Lunch")]),
        ];
        let rows = calculate(&mut buckets, 10_000, &mut |_| {}).unwrap();

        assert_eq!(rows.len(), 3);
        let first = &rows[0];
        assert_eq!(first.record, 0);
        assert_eq!(first.day_income, 1000);
        assert_eq!(first.day_expenses, -500);
        assert_eq!(first.day_net, 500);
        assert_eq!(first.balance, 10_500);
        assert_eq!(first.day_transaction_names, "Coffee; Refund; Zero");
        assert_eq!(first.day_transaction_names_list.len(), 3);

        let quiet = &rows[1];
        assert_eq!(quiet.balance, 10_500);
        assert_eq!(quiet.day_net, 0);
        assert!(quiet.day_transaction_names.is_empty());

        let last = &rows[2];
        assert_eq!(last.balance, 10_250);
        assert_eq!(last.cumulative_income, 1000);
        assert_eq!(last.cumulative_expenses, -750);
        assert_eq!(last.diff_from_start, 250);
    }

    #[test]
    fn sorts_buckets_before_walking() {
        let mut buckets = vec![bucket(3, &[(-1, "c")]), bucket(1, &[(-1, "a")]), bucket(2, &[])];
        let rows = calculate(&mut buckets, 0, &mut |_| {}).unwrap();
        let dates: Vec<_> = rows.iter().map(|row| row.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(rows[0].balance, -1);
        assert_eq!(rows[2].balance, -2);
    }

    #[test]
    fn mismatched_bucket_is_an_internal_error() {
        let mut broken = bucket(1, &[(-1, "a")]);
        broken.names.push("orphan".into());
        let err = calculate(&mut [broken], 0, &mut |_| {}).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InternalConsistency {
                date: date(2024, 1, 1),
                amounts: 1,
                names: 2,
            }
        );
    }

    #[test]
    fn reports_progress_and_completion() {
        let mut buckets = vec![bucket(1, &[]), bucket(2, &[])];
        let mut messages = Vec::new();
        calculate(&mut buckets, 0, &mut |m: &str| messages.push(m.to_string())).unwrap();
        assert_eq!(
            messages,
            vec!["calculating... [0/2]", "calculating... [1/2]", "done [2/2]"]
        );
    }

    #[test]
    fn overflowing_totals_are_reported() {
        let mut buckets = vec![bucket(1, &[(i64::MAX, "Jackpot")]), bucket(2, &[(1, "Tip")])];
        let err = calculate(&mut buckets, 0, &mut |_| {}).unwrap_err();
        assert_eq!(err, ProjectionError::Overflow { date: date(2024, 1, 2) });

        let mut buckets = vec![bucket(1, &[(-1, "Fee")])];
        let err = calculate(&mut buckets, i64::MIN, &mut |_| {}).unwrap_err();
        assert_eq!(err, ProjectionError::Overflow { date: date(2024, 1, 1) });
    }
}
