//! Day-by-day balance projection over an inclusive date window.

mod calculator;
mod day_index;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use calculator::ProjectionRow;

use crate::errors::{ProjectionError, ProjectionResult};
use crate::ledger::TransactionDefinition;
use crate::utils::dates::resolve_window_strings;

/// Progress is reported once every this many definitions or days.
pub const PROGRESS_INTERVAL: usize = 1000;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ProjectionResult<Self> {
        if start > end {
            return Err(ProjectionError::Range { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }
}

/// Projects `definitions` over `[start, end]`, one row per calendar day.
///
/// `progress` receives short status lines while the projection runs. Any
/// failure aborts the whole run.
pub fn project<F>(
    definitions: &[TransactionDefinition],
    start: NaiveDate,
    end: NaiveDate,
    starting_balance: i64,
    mut progress: F,
) -> ProjectionResult<Vec<ProjectionRow>>
where
    F: FnMut(&str),
{
    let window = DateWindow::new(start, end)?;
    tracing::debug!(%start, %end, definitions = definitions.len(), "starting projection");

    progress("preparing dates...");
    let mut buckets = day_index::build_day_index(window);
    day_index::merge_occurrences(&mut buckets, definitions, window, &mut progress)?;

    progress(&format!("sorting dates... [{}]", buckets.len()));
    let rows = calculator::calculate(&mut buckets, starting_balance, &mut progress)?;

    tracing::info!(
        days = rows.len(),
        final_balance = rows.last().map(|row| row.balance).unwrap_or(starting_balance),
        "projection complete"
    );
    Ok(rows)
}

/// Same as [`project`] with `YYYY-MM-DD` window bounds.
///
/// Unset bounds (`"0-0-0"`, `"--"`, `""`) default to `today` and one year
/// after `today`.
pub fn project_from_date_strings<F>(
    definitions: &[TransactionDefinition],
    starting_balance: i64,
    start: &str,
    end: &str,
    today: NaiveDate,
    progress: F,
) -> ProjectionResult<Vec<ProjectionRow>>
where
    F: FnMut(&str),
{
    let (start, end) = resolve_window_strings(start, end, today)?;
    project(definitions, start, end, starting_balance, progress)
}
