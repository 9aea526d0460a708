//! Loose accessors over JSON records.
//!
//! Provider records and task payloads are open maps. Numbers may arrive as
//! JSON numbers or numeric strings ("45000", "$45,000"); these helpers coerce
//! both and treat anything else as absent.

use serde_json::{Map, Value};

/// Reads a number, accepting numeric strings with `$` and `,` decoration.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Reads a numeric field from a record.
pub fn get_f64(record: &Map<String, Value>, key: &str) -> Option<f64> {
    record.get(key).and_then(as_f64).filter(|n| n.is_finite())
}

/// Reads a non-negative whole-number field, truncating fractions.
pub fn get_u32(record: &Map<String, Value>, key: &str) -> Option<u32> {
    get_f64(record, key).filter(|n| *n >= 0.0).map(|n| n.min(f64::from(u32::MAX)) as u32)
}

/// Reads a string field. Numbers are rendered so ids like `1042` still work.
pub fn get_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a boolean field, accepting `"true"`/`"false"` strings.
pub fn get_bool(record: &Map<String, Value>, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Formats a dollar amount as `$1,234.56`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
