// Utility helpers for per-cell parsing, rounding and number formatting.
//
// The scanner leans on the `*_safe` parsers so that a single bad cell turns
// into a missing value instead of failing the whole run.
use num_format::{Locale, ToFormattedString};

/// Parse a text cell, kept exactly as written. Empty cells are missing.
pub fn parse_text_safe(s: Option<&str>) -> Option<String> {
    let s = s?;
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

/// Parse a 64-bit integer cell.
///
/// - Accepts `Option<&str>` so short rows pass straight through as `None`.
/// - Trims whitespace.
/// - Anything that is not a plain integer (`"12.5"`, `"n/a"`) is `None`.
pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Parse a 64-bit float cell. Non-finite results (`"inf"`, `"NaN"`) are
/// rejected so they can never leak into a sum.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round half away from zero to `decimals` places.
pub fn round_to(n: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (n * factor).round() / factor
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with thousands separators on the integer part,
    // e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_val: u64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
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
    n.to_formatted_string(&Locale::en)
}
