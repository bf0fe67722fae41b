#![doc(test(attr(deny(warnings))))]

//! Finance Planner expands recurring transaction definitions into a
//! day-by-day balance projection, then derives summary statistics and CSV
//! exports from it.
//!
//! ```
//! use chrono::NaiveDate;
//! use finance_planner::{project, TransactionDefinition};
//!
//! let rent = TransactionDefinition::new().with_name("Rent").with_amount(-150_000);
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let rows = project(&[rent], start, end, 0, |_| {}).unwrap();
//! assert_eq!(rows.len(), 31);
//! ```

pub mod config;
pub mod currency;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod projection;
pub mod recurrence;
pub mod stats;
pub mod utils;

use std::sync::Once;

pub use errors::{ProjectionError, ProjectionResult};
pub use ledger::{CalendarDate, Frequency, TransactionDefinition, Weekdays};
pub use projection::{project, project_from_date_strings, DateWindow, ProjectionRow};
pub use stats::{compute_stats, SummaryStats};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Planner tracing initialized.");
    });
}
