// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" CSV/number/date/time handling so
// the rest of the code can assume clean, typed values.
use chrono::{NaiveDate, NaiveTime, Timelike};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (whitespace, `NaN`
/// placeholders, stray text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (this also covers
///   the literal `"NaN "` cells the source file uses for missing data).
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.parse::<f64>().ok()
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    // Values like "1.0" come from a float-typed export of an integer count,
    // so fall back to a float parse and keep the value when it is integral.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = parse_f64_safe(Some(s))?;
    if f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Strict `DD-MM-YYYY` date parse. The caller decides whether a failure is
/// fatal; for order dates it is.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y").ok()
}

/// Extract the hour (0-23) from an `HH:MM:SS` time-of-day string.
/// Unparsable text yields `None`; the record keeps loading.
pub fn parse_hour(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .ok()
        .map(|t| t.hour())
}

/// Arithmetic mean. `None` for an empty slice so "no data" stays
/// distinguishable from a real zero.
pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

fn median_of_sorted(v: &[f64]) -> f64 {
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Five-number summary (min, Q1, median, Q3, max) of a sample.
/// Quartiles are medians of the lower/upper half, excluding the middle
/// element for odd-length samples.
pub fn five_number_summary(mut v: Vec<f64>) -> Option<(f64, f64, f64, f64, f64)> {
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let med = median_of_sorted(&v);
    let mid = v.len() / 2;
    let lower = &v[..mid];
    let upper = if v.len() % 2 == 1 { &v[mid + 1..] } else { &v[mid..] };
    let q1 = if lower.is_empty() { med } else { median_of_sorted(lower) };
    let q3 = if upper.is_empty() { med } else { median_of_sorted(upper) };
    Some((v[0], q1, med, q3, v[v.len() - 1]))
}

/// Pearson correlation coefficient over two equal-length samples.
/// `None` when fewer than two pairs exist or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
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

/// Render an optional metric, falling back to `n/a` when no data exists.
pub fn format_opt_number(n: Option<f64>, decimals: usize) -> String {
    match n {
        Some(v) => format_number(v, decimals),
        None => "n/a".to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `45,593 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_rejects_nan_placeholder() {
        assert_eq!(parse_f64_safe(Some("NaN ")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_f64_safe(Some(" 4.5 ")), Some(4.5));
    }

    #[test]
    fn test_parse_i64_accepts_float_typed_integers() {
        assert_eq!(parse_i64_safe(Some("25")), Some(25));
        assert_eq!(parse_i64_safe(Some("1.0")), Some(1));
        assert_eq!(parse_i64_safe(Some("1.5")), None);
        assert_eq!(parse_i64_safe(Some("NaN ")), None);
    }

    #[test]
    fn test_parse_date_day_month_year() {
        let d = parse_date("12-02-2022").unwrap();
        assert_eq!(d, chrono::NaiveDate::from_ymd_opt(2022, 2, 12).unwrap());
        assert!(parse_date("2022-02-12").is_none());
    }

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour(Some("11:30:00")), Some(11));
        assert_eq!(parse_hour(Some("not-a-time")), None);
        assert_eq!(parse_hour(None), None);
    }

    #[test]
    fn test_mean_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[10.0, 20.0, 30.0]), Some(20.0));
    }

    #[test]
    fn test_five_number_summary() {
        let (min, q1, med, q3, max) =
            five_number_summary(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(min, 1.0);
        assert_eq!(q1, 1.5);
        assert_eq!(med, 3.0);
        assert_eq!(q3, 4.5);
        assert_eq!(max, 5.0);
        assert!(five_number_summary(vec![]).is_none());
    }

    #[test]
    fn test_pearson_perfect_and_degenerate() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [2.0, 4.0, 6.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        // Constant column has zero variance.
        assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }
}
