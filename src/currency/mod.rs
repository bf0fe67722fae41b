//! Minor-unit currency formatting and free-form amount parsing.
//!
//! Amounts are always integers in minor units (cents), so `10000` is `$100.00`.

/// Symbol used when no currency has been configured.
pub const DEFAULT_SYMBOL: &str = "$";

pub fn symbol_for(code: &str) -> String {
    match code.to_uppercase().as_str() {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "CAD".into(),
        "CHF" => "CHF".into(),
        other => other.into(),
    }
}

/// Formats minor units with the default `$` symbol, e.g. `-1` → `$-0.01`.
pub fn format_as_currency(amount: i64) -> String {
    format_with_symbol(amount, DEFAULT_SYMBOL)
}

/// Formats minor units as `<symbol><sign><units>.<cents>`.
pub fn format_with_symbol(amount: i64, symbol: &str) -> String {
    if amount == 0 {
        return format!("{}0.00", symbol);
    }
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    format!("{}{}{}.{:02}", symbol, sign, magnitude / 100, magnitude % 100)
}

/// Parses user-entered text such as `$100.2` into minor units.
///
/// Values default to negative (recurring bills) unless the input starts with
/// `+`/`$+` or `assume_positive` is set. With `assume_positive`, a leading
/// `-`/`$-` still makes the value negative. Everything except digits and `.`
/// is discarded. With a single `.`, the fraction is read as cents: one digit
/// not starting with `0` is scaled by ten, three or more digits are dropped.
pub fn parse_dollar_amount(input: &str, assume_positive: bool) -> i64 {
    let explicit_positive = input.starts_with('+') || input.starts_with("$+");
    let explicit_negative = input.starts_with('-') || input.starts_with("$-");

    let mut multiplier: i64 = -1;
    if explicit_positive || assume_positive {
        multiplier = 1;
    }
    if assume_positive && explicit_negative {
        multiplier = -1;
    }

    let cleaned: String = input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    let parts: Vec<&str> = cleaned.split('.').collect();

    let mut cents: i64 = 0;
    if parts.len() == 2 {
        let fraction = parts[1];
        cents = fraction.parse::<i64>().unwrap_or(0);
        if !fraction.starts_with('0') && cents < 10 {
            cents *= 10;
        }
        if cents >= 100 {
            cents = 0;
        }
    }

    let whole = parts[0].parse::<i64>().unwrap_or(0);
    multiplier * whole.saturating_mul(100).saturating_add(cents)
}
