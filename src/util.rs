// Utility helpers for parsing counters and formatting numbers.
//
// This module centralizes the forgiving text-to-number handling so the
// rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Read the leading integer of a string-like value.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace and accepts one leading `+` or `-`.
/// - Stops at the first non-digit, so `"3.7"` reads as `3` and `"12 dogs"`
///   as `12`.
/// - Returns `None` when no digit precedes that point or the value
///   overflows.
pub fn parse_leading_int(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Counter value of a field; anything unreadable counts as zero.
pub fn parse_count(s: Option<&str>) -> i64 {
    parse_leading_int(s).unwrap_or(0)
}

pub fn parse_year(s: Option<&str>) -> Option<i32> {
    parse_leading_int(s).and_then(|y| i32::try_from(y).ok())
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places with locale-aware thousands separators,
    // e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_val: i64 = parts.next().unwrap_or("0").parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = parts.next() {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g. `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
