use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::{CalendarDate, Frequency, Weekdays};

/// Amount given to freshly created definitions, in minor units.
pub const DEFAULT_AMOUNT: i64 = 500;
/// Name given to freshly created definitions.
pub const NEW_DEFINITION_NAME: &str = "New";
/// Fixed-length month used to place the default end date.
pub const DAYS_IN_MONTH: i64 = 31;

/// One recurring cash-flow rule.
///
/// A non-empty `rrule` takes precedence; otherwise the structured fields
/// (`frequency`, `interval`, `starts`, `ends`, `weekdays`) decide when the
/// definition occurs. The projection engine never mutates definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDefinition {
    /// Minor units; negative values are expenses.
    pub amount: i64,
    pub active: bool,
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub rrule: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "TransactionDefinition::default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub weekdays: Weekdays,
    #[serde(default)]
    pub starts: CalendarDate,
    #[serde(default)]
    pub ends: CalendarDate,
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    /// Table selection state; ignored by the engine.
    #[serde(default)]
    pub selected: bool,
}

impl TransactionDefinition {
    pub fn new() -> Self {
        Self::new_at(Utc::now())
    }

    /// Builds a definition with defaults anchored at `reference`: a monthly
    /// entry starting that day and ending 31 days later.
    pub fn new_at(reference: DateTime<Utc>) -> Self {
        let one_month = reference + Duration::days(DAYS_IN_MONTH);
        Self {
            amount: DEFAULT_AMOUNT,
            active: true,
            name: NEW_DEFINITION_NAME.to_string(),
            note: String::new(),
            rrule: String::new(),
            frequency: Frequency::Monthly,
            interval: 1,
            weekdays: Weekdays::none(),
            starts: reference.date_naive().into(),
            ends: one_month.date_naive().into(),
            id: Uuid::new_v4(),
            created_at: reference,
            updated_at: reference,
            selected: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = rrule.into();
        self
    }

    pub fn start_date_string(&self) -> String {
        self.starts.to_string()
    }

    pub fn end_date_string(&self) -> String {
        self.ends.to_string()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn default_interval() -> u32 {
        1
    }
}

impl Default for TransactionDefinition {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the definition with the given id.
pub fn find_by_id(definitions: &[TransactionDefinition], id: Uuid) -> Option<usize> {
    definitions.iter().position(|definition| definition.id == id)
}

/// Copy of `definitions` without the entry carrying `id`.
pub fn without_id(definitions: &[TransactionDefinition], id: Uuid) -> Vec<TransactionDefinition> {
    definitions
        .iter()
        .filter(|definition| definition.id != id)
        .cloned()
        .collect()
}

/// Removes the definition carrying `id`, preserving the order of the rest.
pub fn remove_by_id(
    definitions: &mut Vec<TransactionDefinition>,
    id: Uuid,
) -> Option<TransactionDefinition> {
    let idx = find_by_id(definitions, id)?;
    Some(definitions.remove(idx))
}
