// Utility helpers for parsing and console number formatting.
//
// This module centralizes all the "dirty" CSV/number/timestamp handling so
// the rest of the code can assume clean, typed values.
use chrono::NaiveDateTime;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(",", "");
    // Counts occasionally come back as "120.0" after a spreadsheet round
    // trip; accept the float form and truncate.
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 => Some(f as u64),
        _ => None,
    }
}

pub fn parse_timestamp_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    // Timestamps are written as `2025-11-03T14:05:00`; tolerate a space
    // separator for rows edited by hand in a spreadsheet.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
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
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `1,234 beneficiaries`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_parsing_is_forgiving() {
        assert_eq!(parse_f64_safe(Some("1,250.50")), Some(1250.50));
        assert_eq!(parse_f64_safe(Some("  42 ")), Some(42.0));
        assert_eq!(parse_f64_safe(Some("RM 100")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn u64_parsing_accepts_float_form() {
        assert_eq!(parse_u64_safe(Some("120")), Some(120));
        assert_eq!(parse_u64_safe(Some("120.0")), Some(120));
        assert_eq!(parse_u64_safe(Some("1,500")), Some(1500));
        assert_eq!(parse_u64_safe(Some("-3")), None);
        assert_eq!(parse_u64_safe(Some("abc")), None);
    }

    #[test]
    fn timestamp_parsing_tolerates_space_separator() {
        assert!(parse_timestamp_safe(Some("2025-11-03T14:05:00")).is_some());
        assert!(parse_timestamp_safe(Some("2025-11-03 14:05:00")).is_some());
        assert!(parse_timestamp_safe(Some("03/11/2025")).is_none());
        assert!(parse_timestamp_safe(Some("")).is_none());
        assert!(parse_timestamp_safe(None).is_none());
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 2), "-42.00");
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_int(9855_i64), "9,855");
    }
}
