use chrono::NaiveDate;
use thiserror::Error;

/// Error type that captures projection failures.
///
/// Every variant aborts the whole projection; no partial rows are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("start date is after end date: {start} vs {end}")]
    Range { start: NaiveDate, end: NaiveDate },
    #[error("failed to process recurrence for `{name}`: {reason}")]
    RecurrenceParse { name: String, reason: String },
    #[error(
        "there was a different number of transaction amounts ({amounts}) versus transaction names ({names}) for date {date}"
    )]
    InternalConsistency {
        date: NaiveDate,
        amounts: usize,
        names: usize,
    },
    #[error("running totals overflowed on {date}")]
    Overflow { date: NaiveDate },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("export error: {0}")]
    Export(String),
}

impl ProjectionError {
    pub fn recurrence(name: &str, reason: impl Into<String>) -> Self {
        ProjectionError::RecurrenceParse {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for ProjectionError {
    fn from(error: csv::Error) -> Self {
        ProjectionError::Export(error.to_string())
    }
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;
