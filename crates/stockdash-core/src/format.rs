// ── Display formatting ──
//
// Fixed en-US number formatting and day-first timestamps, independent of
// the host locale. Negative values always render with a leading `-` so the
// UI can color deltas by looking at the first character.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Shown for NaN and infinities.
pub const NOT_A_NUMBER: &str = "n/a";

/// Split `|value|` rounded to two decimals into whole units and hundredths.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn to_cents(value: f64) -> (u64, u64) {
    let cents = (value.abs() * 100.0).round() as u64;
    (cents / 100, cents % 100)
}

fn group_thousands(mut whole: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if whole < 1000 {
            groups.push(whole.to_string());
            break;
        }
        groups.push(format!("{:03}", whole % 1000));
        whole /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

fn sign(negative: bool) -> &'static str {
    if negative { "-" } else { "" }
}

/// `-$1,234.50`: USD, grouped, exactly two decimals.
pub fn fmt_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_owned();
    }
    let (whole, cents) = to_cents(value);
    let negative = value < 0.0 && (whole, cents) != (0, 0);
    format!("{}${}.{cents:02}", sign(negative), group_thousands(whole))
}

/// `1,234.5`: grouped, at most two decimals, trailing zeros dropped.
pub fn fmt_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_A_NUMBER.to_owned();
    }
    let (whole, cents) = to_cents(value);
    let negative = value < 0.0 && (whole, cents) != (0, 0);
    let grouped = group_thousands(whole);
    let fraction = match cents {
        0 => String::new(),
        c if c % 10 == 0 => format!(".{}", c / 10),
        c => format!(".{c:02}"),
    };
    format!("{}{grouped}{fraction}", sign(negative))
}

/// `12.34%` from the fraction `0.1234`.
pub fn fmt_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return NOT_A_NUMBER.to_owned();
    }
    format!("{:.2}%", fraction * 100.0)
}

/// `dd/mm/yyyy, HH:MM:SS` in the timestamp's own zone.
pub fn fmt_datetime<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// The part of a [`fmt_datetime`] label after the comma, or the whole label
/// if it has none.
pub fn tick_label(label: &str) -> &str {
    match label.split_once(',') {
        Some((_, time)) if !time.trim().is_empty() => time.trim(),
        _ => label,
    }
}

/// Whether a formatted value should be styled as a negative delta.
pub fn is_negative_display(formatted: &str) -> bool {
    formatted.starts_with('-')
}
