//! Reader for the RFC 5545 recurrence text stored on definitions.
//!
//! Supported: `DTSTART`, `RRULE` (also a bare `FREQ=...` line), `RDATE`,
//! `EXDATE`. Rule parts: `FREQ`, `INTERVAL`, `UNTIL`, `BYDAY` (plain or
//! ordinal), `BYMONTHDAY`, `BYYEARDAY`, `BYMONTH`, `BYSETPOS` and `WKST=MO`.
//! Occurrence counts and sub-daily parts are rejected. Time-of-day and `TZID`
//! parameters are discarded.

use std::str::FromStr;

use chrono::{NaiveDate, Weekday};

use super::rule::{NthWeekday, RecurrenceRule, RecurrenceSet, RuleError};
use crate::ledger::{Frequency, Weekdays};

impl FromStr for RecurrenceSet {
    type Err = RuleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut set = RecurrenceSet::default();
        for raw_line in text.lines() {
            let line = raw_line.trim().to_ascii_uppercase();
            if line.is_empty() {
                continue;
            }
            let (name, value) = split_property(&line);
            match name {
                "DTSTART" => set.start = Some(parse_date_value(value)?),
                "RRULE" => set.rules.push(parse_rule(value)?),
                "RDATE" => set.rdates.extend(parse_date_list(value)?),
                "EXDATE" => set.exdates.extend(parse_date_list(value)?),
                "EXRULE" => return Err(RuleError::Unsupported("EXRULE".into())),
                _ if line.starts_with("FREQ=") => set.rules.push(parse_rule(&line)?),
                _ => return Err(RuleError::UnknownLine(raw_line.trim().to_string())),
            }
        }
        Ok(set)
    }
}

/// Splits `NAME;PARAM=X:VALUE` into the property name and its value.
fn split_property(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((head, value)) => {
            let name = head.split(';').next().unwrap_or(head);
            (name, value)
        }
        None => ("", line),
    }
}

fn parse_rule(value: &str) -> Result<RecurrenceRule, RuleError> {
    let mut frequency = None;
    let mut interval = 1u32;
    let mut until = None;
    let mut weekdays = None;
    let mut nth_weekdays = Vec::new();
    let mut month_days = Vec::new();
    let mut year_days = Vec::new();
    let mut months = Vec::new();
    let mut set_positions = Vec::new();

    for part in value.split(';').filter(|part| !part.is_empty()) {
        let (key, val) = part.split_once('=').ok_or_else(|| RuleError::InvalidValue {
            part: "rule".into(),
            value: part.to_string(),
        })?;
        match key {
            "FREQ" => frequency = Some(parse_frequency(val)?),
            "INTERVAL" => {
                interval = val.parse::<u32>().map_err(|_| invalid_value(key, val))?
            }
            "UNTIL" => until = Some(parse_date_value(val)?),
            "BYDAY" => {
                let (plain, ordinals) = parse_weekday_list(val)?;
                weekdays = plain;
                nth_weekdays = ordinals;
            }
            "BYMONTHDAY" => month_days = parse_signed_list(key, val, 31)?,
            "BYYEARDAY" => year_days = parse_signed_list(key, val, 366)?,
            "BYSETPOS" => set_positions = parse_signed_list(key, val, 366)?,
            "BYMONTH" => {
                months = val
                    .split(',')
                    .map(|item| match item.parse::<u32>() {
                        Ok(month @ 1..=12) => Ok(month),
                        _ => Err(invalid_value(key, item)),
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            "WKST" => {
                if parse_weekday(val)? != Weekday::Mon {
                    return Err(RuleError::Unsupported(format!("WKST={val}")));
                }
            }
            other => return Err(RuleError::Unsupported(other.to_string())),
        }
    }

    let frequency = frequency.ok_or(RuleError::MissingFrequency)?;
    let mut rule = RecurrenceRule::new(frequency, interval)?
        .by_nth_weekday(&nth_weekdays)
        .by_month_day(&month_days)
        .by_year_day(&year_days)
        .by_month(&months)
        .by_set_pos(&set_positions);
    rule.until = until;
    rule.by_weekday = weekdays;
    Ok(rule)
}

fn invalid_value(part: &str, value: &str) -> RuleError {
    RuleError::InvalidValue {
        part: part.to_string(),
        value: value.to_string(),
    }
}

/// Comma-separated non-zero integers within `-max..=max`.
fn parse_signed_list(part: &str, value: &str, max: i32) -> Result<Vec<i32>, RuleError> {
    value
        .split(',')
        .map(|item| match item.trim_start_matches('+').parse::<i32>() {
            Ok(number) if number != 0 && number.abs() <= max => Ok(number),
            _ => Err(invalid_value(part, item)),
        })
        .collect()
}

fn parse_frequency(value: &str) -> Result<Frequency, RuleError> {
    match value {
        "DAILY" => Ok(Frequency::Daily),
        "WEEKLY" => Ok(Frequency::Weekly),
        "MONTHLY" => Ok(Frequency::Monthly),
        "YEARLY" => Ok(Frequency::Yearly),
        other => Err(RuleError::UnknownFrequency(other.to_string())),
    }
}

/// Splits `BYDAY` into plain weekdays and ordinal ones such as `-1FR`.
fn parse_weekday_list(value: &str) -> Result<(Option<Weekdays>, Vec<NthWeekday>), RuleError> {
    let mut plain = Vec::new();
    let mut ordinals = Vec::new();
    for code in value.split(',') {
        match split_ordinal(code) {
            Some((nth, day)) => ordinals.push(NthWeekday::new(nth, parse_weekday(day)?)),
            None => plain.push(parse_weekday(code)?),
        }
    }
    let plain = (!plain.is_empty()).then(|| Weekdays::from_days(&plain));
    Ok((plain, ordinals))
}

fn parse_weekday(code: &str) -> Result<Weekday, RuleError> {
    match code {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        other => Err(invalid_value("BYDAY", other)),
    }
}

/// `1MO` → `(1, "MO")`, `-2FR` → `(-2, "FR")`; plain codes give `None`.
fn split_ordinal(code: &str) -> Option<(i32, &str)> {
    let split = code.len().checked_sub(2)?;
    let (prefix, day) = (code.get(..split)?, code.get(split..)?);
    if prefix.is_empty() {
        return None;
    }
    let nth = prefix.trim_start_matches('+').parse::<i32>().ok()?;
    (nth != 0 && nth.abs() <= 53).then_some((nth, day))
}

fn parse_date_list(value: &str) -> Result<Vec<NaiveDate>, RuleError> {
    value
        .split(',')
        .filter(|item| !item.is_empty())
        .map(parse_date_value)
        .collect()
}

/// Reads `YYYYMMDD` with an optional `THHMMSS[Z]` suffix, keeping only the date.
fn parse_date_value(value: &str) -> Result<NaiveDate, RuleError> {
    let value = value.trim();
    let invalid = || RuleError::InvalidDate(value.to_string());
    let (date_part, time_part) = match value.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    };
    if date_part.len() != 8 || !date_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if let Some(time) = time_part {
        let digits = time.strip_suffix('Z').unwrap_or(time);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
    }
    let year = date_part[0..4].parse::<i32>().map_err(|_| invalid())?;
    let month = date_part[4..6].parse::<u32>().map_err(|_| invalid())?;
    let day = date_part[6..8].parse::<u32>().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
