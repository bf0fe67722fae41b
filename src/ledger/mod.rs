//! Transaction definitions and their structured scheduling fields.

pub mod schedule;
pub mod transaction;

pub use schedule::{CalendarDate, Frequency, Weekdays};
pub use transaction::{
    find_by_id, remove_by_id, without_id, TransactionDefinition, DEFAULT_AMOUNT,
    NEW_DEFINITION_NAME,
};
