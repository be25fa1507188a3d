//! Display formatting of raw JSON values.
//!
//! All formatting runs once per render from the server's raw values.

use serde_json::{Number, Value};

/// Marker shown for missing or null values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns true when a value should render as [`NOT_AVAILABLE`].
#[must_use]
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s == NOT_AVAILABLE,
        Some(_) => false,
    }
}

/// Inserts thousands separators into a run of ASCII digits.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a float with thousands separators and at most three fraction digits.
///
/// ```
/// use screener_view::format::group_float;
///
/// assert_eq!(group_float(1234567.5), "1,234,567.5");
/// assert_eq!(group_float(-0.12345), "-0.123");
/// ```
#[must_use]
pub fn group_float(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if n.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Formats a JSON number with thousands separators.
///
/// Integers are grouped exactly; floats go through [`group_float`].
#[must_use]
pub fn group_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        let grouped = group_digits(&i.unsigned_abs().to_string());
        return if i < 0 { format!("-{grouped}") } else { grouped };
    }
    if let Some(u) = n.as_u64() {
        return group_digits(&u.to_string());
    }
    n.as_f64().map(group_float).unwrap_or_else(|| n.to_string())
}

/// Formats a JSON number as a dollar amount.
///
/// The sign stays with the digits, so negatives read `$-1,234`.
#[must_use]
pub fn currency(n: &Number) -> String {
    format!("${}", group_number(n))
}

/// Formats a JSON number with two fixed decimals.
#[must_use]
pub fn ratio(n: &Number) -> String {
    n.as_f64()
        .map(|f| format!("{f:.2}"))
        .unwrap_or_else(|| n.to_string())
}

/// Renders a value as-is.
///
/// Strings are shown without quotes, whole floats without a trailing `.0`,
/// and nested structures as compact JSON.
#[must_use]
pub fn raw(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Shared cell rule: grouped numbers, [`NOT_AVAILABLE`] for null or
/// missing values, anything else verbatim.
#[must_use]
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::Number(n)) => group_number(n),
        Some(other) => raw(other),
    }
}
