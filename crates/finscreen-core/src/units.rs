//! Parsing of currency, percentage and unit-suffixed cells.
//!
//! The upstream service renders numbers for humans: `"$1.2B"`, `"12.5%"`,
//! `"1,234"`, with `"-"` or `"N/A"` standing in for missing data. Every
//! failure maps to `None`; nothing here returns an error.

use serde::{Deserialize, Serialize};

/// Cell contents that mean "not available".
pub const MISSING_MARKERS: [&str; 3] = ["", "-", "N/A"];

/// A parsed numeric cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    /// Integral value, accepting floats without a fractional part.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(value),
            Self::Float(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
                Some(value as i64)
            }
            Self::Float(_) => None,
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        self.as_i64().and_then(|value| u64::try_from(value).ok())
    }
}

/// Whether a raw cell is one of the "not available" markers.
pub fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw.trim())
}

/// Parse one raw cell into a number, or `None` when it is missing or
/// malformed.
///
/// B/M/K suffixes are applied by moving the decimal point in the digit string,
/// so `"$1.005B"` is exactly `1_005_000_000` with no floating-point drift.
pub fn parse_numeric(raw: &str) -> Option<Number> {
    let value = raw.trim();
    if is_missing(value) {
        return None;
    }

    if let Some(percentage) = value.strip_suffix('%') {
        return parse_float(&strip_currency(percentage));
    }

    let cleaned = strip_currency(value);
    for (suffix, places) in [('B', 9), ('M', 6), ('K', 3)] {
        if let Some(mantissa) = cleaned.strip_suffix(suffix) {
            return shift_decimal(mantissa, places);
        }
    }

    if cleaned.contains('.') {
        parse_float(&cleaned)
    } else {
        cleaned.parse::<i64>().ok().map(Number::Integer)
    }
}

fn strip_currency(value: &str) -> String {
    let value = value.trim();
    let (sign, rest) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let mut cleaned = String::with_capacity(value.len());
    cleaned.push_str(sign);
    cleaned.extend(rest.chars().filter(|ch| *ch != ','));
    cleaned
}

fn parse_float(value: &str) -> Option<Number> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .map(Number::Float)
}

/// Multiply a decimal string by `10^places` without going through `f64`.
pub(crate) fn shift_decimal(mantissa: &str, places: usize) -> Option<Number> {
    let (negative, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let well_formed = !(whole.is_empty() && fraction.is_empty())
        && whole.chars().all(|ch| ch.is_ascii_digit())
        && fraction.chars().all(|ch| ch.is_ascii_digit());
    if !well_formed {
        return None;
    }

    let sign = if negative { "-" } else { "" };
    if fraction.len() <= places {
        let padding = "0".repeat(places - fraction.len());
        let shifted = format!("{sign}{whole}{fraction}{padding}");
        match shifted.parse::<i64>() {
            Ok(value) => Some(Number::Integer(value)),
            Err(_) => parse_float(&shifted),
        }
    } else {
        let (carried, remainder) = fraction.split_at(places);
        parse_float(&format!("{sign}{whole}{carried}.{remainder}"))
    }
}

/// Divide a decimal string by `10^places`, returning the shortest decimal
/// string. Inverse of [`shift_decimal`].
pub(crate) fn unshift_decimal(number: &str, places: usize) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let joined = format!("{whole}{fraction}");

    let (int_part, frac_part) = if whole.len() > places {
        let point = whole.len() - places;
        (joined[..point].to_owned(), joined[point..].to_owned())
    } else {
        (String::new(), format!("{}{joined}", "0".repeat(places - whole.len())))
    };

    let int_part = match int_part.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}
