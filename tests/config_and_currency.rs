mod common;

use chrono::{TimeZone, Utc};
use common::{date, monthly};
use finance_planner::config::{Config, ConfigManager};
use finance_planner::currency::{format_as_currency, parse_dollar_amount};
use finance_planner::ledger::{find_by_id, remove_by_id, without_id};
use finance_planner::utils::dates::{default_end_date_string, parse_date_string};
use finance_planner::{Frequency, TransactionDefinition, Weekdays};
use tempfile::TempDir;

#[test]
fn definitions_round_trip_through_json() {
    let mut weekly = monthly(-2_500).with_name("Groceries");
    weekly.frequency = Frequency::Weekly;
    weekly.weekdays = Weekdays::all();
    let saved = vec![weekly, monthly(300_000).with_name("Salary")];

    let raw = serde_json::to_string_pretty(&saved).unwrap();
    assert!(raw.contains("\"frequency\": \"WEEKLY\""), "got {raw}");

    let loaded: Vec<TransactionDefinition> = serde_json::from_str(&raw).unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn configured_window_drives_projection() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let config = Config {
        starting_balance: 10_000,
        start_date: "2024-01-01".into(),
        end_date: "2024-12-31".into(),
        ..Config::default()
    };
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    let rows = loaded
        .project(&[monthly(-10_000)], date(2030, 6, 1), |_| {})
        .unwrap();
    assert_eq!(rows.len(), 366);
    assert_eq!(rows.last().map(|row| row.balance), Some(10_000 - 120_000));
}

#[test]
fn removal_helpers_do_not_touch_other_entries() {
    let definitions = vec![
        monthly(-1).with_name("a"),
        monthly(-2).with_name("b"),
        monthly(-3).with_name("c"),
    ];
    let target = definitions[1].id;

    assert_eq!(find_by_id(&definitions, target), Some(1));
    let filtered = without_id(&definitions, target);
    assert_eq!(filtered.len(), 2);
    assert_eq!(definitions.len(), 3);

    let mut owned = definitions.clone();
    let removed = remove_by_id(&mut owned, target).map(|definition| definition.name);
    assert_eq!(removed.as_deref(), Some("b"));
    assert_eq!(
        owned.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        vec!["a", "c"]
    );
    assert_eq!(remove_by_id(&mut owned, target), None);
}

#[test]
fn new_definition_defaults() {
    let reference = Utc.with_ymd_and_hms(2024, 12, 1, 10, 23, 1).unwrap();
    let definition = TransactionDefinition::new_at(reference);
    assert_eq!(definition.amount, 500);
    assert_eq!(definition.name, "New");
    assert_eq!(definition.frequency, Frequency::Monthly);
    assert_eq!(definition.start_date_string(), "2024-12-01");
    assert_eq!(definition.end_date_string(), "2025-01-01");
    assert_eq!(definition.weekdays, Weekdays::none());
    assert_eq!(default_end_date_string(reference), "2025-12-01");
}

#[test]
fn currency_round_trips_sign_and_magnitude() {
    assert_eq!(format_as_currency(-1), "$-0.01");
    assert_eq!(format_as_currency(0), "$0.00");
    assert_eq!(format_as_currency(10000), "$100.00");
    assert_eq!(parse_dollar_amount("$100.2", false), -10020);
    assert_eq!(parse_dollar_amount("$100.243", false), -10000);
    assert_eq!(parse_dollar_amount("+$1,234.56", false), 123456);
    assert_eq!(parse_date_string("2024-02-29"), (2024, 2, 29));
    assert_eq!(parse_date_string("2024/02/29"), (0, 0, 0));
}
