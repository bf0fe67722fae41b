//! Delimited rendering of projection rows.

use csv::WriterBuilder;

use crate::currency::{format_with_symbol, DEFAULT_SYMBOL};
use crate::errors::{ProjectionError, ProjectionResult};
use crate::projection::ProjectionRow;
use crate::utils::dates::format_date;

pub const HEADER: [&str; 9] = [
    "date",
    "balance",
    "cumulative_income",
    "cumulative_expenses",
    "day_expenses",
    "day_income",
    "day_net",
    "diff_from_start",
    "day_transaction_names",
];

/// One record per row, no header, amounts formatted with `$`.
pub fn render(rows: &[ProjectionRow]) -> ProjectionResult<String> {
    write_rows(rows, DEFAULT_SYMBOL, false)
}

pub fn render_with_header(rows: &[ProjectionRow]) -> ProjectionResult<String> {
    write_rows(rows, DEFAULT_SYMBOL, true)
}

/// Like [`render`] but with a caller supplied currency symbol.
pub fn render_with_symbol(rows: &[ProjectionRow], symbol: &str) -> ProjectionResult<String> {
    write_rows(rows, symbol, false)
}

fn write_rows(rows: &[ProjectionRow], symbol: &str, header: bool) -> ProjectionResult<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    if header {
        writer.write_record(HEADER)?;
    }
    for row in rows {
        let money = |amount| format_with_symbol(amount, symbol);
        writer.write_record([
            format_date(row.date),
            money(row.balance),
            money(row.cumulative_income),
            money(row.cumulative_expenses),
            money(row.day_expenses),
            money(row.day_income),
            money(row.day_net),
            money(row.diff_from_start),
            row.day_transaction_names.clone(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ProjectionError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ProjectionError::Export(err.to_string()))
}
