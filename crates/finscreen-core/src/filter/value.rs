use serde::Deserialize;
use time::Date;

use crate::error::FilterError;
use crate::units::{shift_decimal, unshift_decimal, Number};

/// A validated filter value. Token and list entries hold service tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Token(String),
    Range(RangeValue),
    Flag,
    List(Vec<String>),
    DateRange { start: Date, end: Date },
}

impl FilterValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Token(_) => "token",
            Self::Range(_) => "range",
            Self::Flag => "flag",
            Self::List(_) => "list",
            Self::DateRange { .. } => "date range",
        }
    }
}

/// Numeric range in caller units; at least one side is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValue {
    min: Option<f64>,
    max: Option<f64>,
}

impl RangeValue {
    pub fn new(key: &str, min: Option<f64>, max: Option<f64>) -> Result<Self, FilterError> {
        if min.is_none() && max.is_none() {
            return Err(FilterError::invalid(key, "a range needs a minimum or a maximum"));
        }
        for value in min.iter().chain(max.iter()) {
            check_bound(key, *value)?;
        }
        if let (Some(low), Some(high)) = (min, max) {
            if low > high {
                return Err(FilterError::invalid(
                    key,
                    format!(
                        "minimum {} exceeds maximum {}",
                        format_number(low),
                        format_number(high)
                    ),
                ));
            }
        }
        Ok(Self { min, max })
    }

    pub fn at_least(key: &str, min: f64) -> Result<Self, FilterError> {
        Self::new(key, Some(min), None)
    }

    pub fn at_most(key: &str, max: f64) -> Result<Self, FilterError> {
        Self::new(key, None, Some(max))
    }

    pub const fn min(&self) -> Option<f64> {
        self.min
    }

    pub const fn max(&self) -> Option<f64> {
        self.max
    }
}

fn check_bound(key: &str, value: f64) -> Result<(), FilterError> {
    if !value.is_finite() {
        return Err(FilterError::invalid(key, "value must be a finite number"));
    }
    if value < 0.0 {
        return Err(FilterError::invalid(
            key,
            format!("value must not be negative, got {}", format_number(value)),
        ));
    }
    Ok(())
}

/// One side of a range as the caller supplied it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    /// A bare numeric string or a pre-encoded token such as `o5`, `5to`,
    /// `u10` or `to10`.
    Token(String),
}

impl Bound {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Token(token) if token.trim().is_empty())
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Self::Token(value.to_owned())
    }
}

/// How a range-valued service field spells its bounds.
///
/// Caller units are service units times `10^places`: average volume is given
/// in shares but the service counts thousands, so it shifts by 3 places. The
/// shift moves the decimal point in the digit string, never through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEncoding {
    pub over: Option<&'static str>,
    pub under: Option<&'static str>,
    /// Upper end written after `to` when only a minimum is given.
    pub open_end: &'static str,
    pub places: usize,
}

impl RangeEncoding {
    /// `o{min}`, `u{max}`, `{min}to{max}`.
    pub const PRESET: Self = Self {
        over: Some("o"),
        under: Some("u"),
        open_end: "",
        places: 0,
    };

    /// `{min}to`, `to{max}`, `{min}to{max}`.
    pub const CUSTOM: Self = Self {
        over: None,
        under: None,
        open_end: "",
        places: 0,
    };

    pub const fn shifted(self, places: usize) -> Self {
        Self { places, ..self }
    }

    pub const fn over(self, prefix: &'static str) -> Self {
        Self {
            over: Some(prefix),
            ..self
        }
    }

    pub const fn open_end(self, open_end: &'static str) -> Self {
        Self { open_end, ..self }
    }

    /// Render a range as the token after `<field>_`.
    pub fn encode(&self, range: &RangeValue) -> String {
        let scaled = |value: f64| unshift_decimal(&format_number(value), self.places);
        match (range.min, range.max) {
            (Some(min), Some(max)) => format!("{}to{}", scaled(min), scaled(max)),
            (Some(min), None) => match self.over {
                Some(prefix) => format!("{prefix}{}", scaled(min)),
                None => format!("{}to{}", scaled(min), self.open_end),
            },
            (None, Some(max)) => match self.under {
                Some(prefix) => format!("{prefix}{}", scaled(max)),
                None => format!("to{}", scaled(max)),
            },
            (None, None) => String::new(),
        }
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(&self, key: &str, token: &str) -> Result<RangeValue, FilterError> {
        let (min, max) = self.split_literal(key, token)?;
        RangeValue::new(key, min, max)
    }

    /// Caller-facing lower bound in caller units.
    pub fn min_from(&self, key: &str, bound: &Bound) -> Result<f64, FilterError> {
        match bound {
            Bound::Number(value) => checked(key, *value),
            Bound::Token(token) => {
                let token = token.trim();
                let digits = self
                    .over
                    .into_iter()
                    .chain(["o"])
                    .find_map(|prefix| token.strip_prefix(prefix))
                    .or_else(|| token.strip_suffix("to"))
                    .unwrap_or(token);
                if digits.len() == token.len() {
                    checked(key, parse_amount(key, digits, token)?)
                } else {
                    checked(key, self.caller_amount(key, digits, token)?)
                }
            }
        }
    }

    /// Caller-facing upper bound in caller units.
    pub fn max_from(&self, key: &str, bound: &Bound) -> Result<f64, FilterError> {
        match bound {
            Bound::Number(value) => checked(key, *value),
            Bound::Token(token) => {
                let token = token.trim();
                let digits = self
                    .under
                    .into_iter()
                    .chain(["u"])
                    .find_map(|prefix| token.strip_prefix(prefix))
                    .or_else(|| token.strip_prefix("to"))
                    .unwrap_or(token);
                if digits.len() == token.len() {
                    checked(key, parse_amount(key, digits, token)?)
                } else {
                    checked(key, self.caller_amount(key, digits, token)?)
                }
            }
        }
    }

    /// A whole literal such as `o5`, `u10` or `5to10`, in service units.
    pub fn literal(&self, key: &str, token: &str) -> Result<RangeValue, FilterError> {
        self.decode(key, token.trim())
    }

    fn split_literal(
        &self,
        key: &str,
        token: &str,
    ) -> Result<(Option<f64>, Option<f64>), FilterError> {
        let scaled = |digits: &str| -> Result<Option<f64>, FilterError> {
            if digits.is_empty() || (!self.open_end.is_empty() && digits == self.open_end) {
                return Ok(None);
            }
            self.caller_amount(key, digits, token).map(Some)
        };

        if let Some((low, high)) = token.split_once("to") {
            return Ok((scaled(low)?, scaled(high)?));
        }
        for prefix in self.over.into_iter().chain(["o"]) {
            if let Some(digits) = token.strip_prefix(prefix) {
                return Ok((scaled(digits)?, None));
            }
        }
        for prefix in self.under.into_iter().chain(["u"]) {
            if let Some(digits) = token.strip_prefix(prefix) {
                return Ok((None, scaled(digits)?));
            }
        }
        Err(FilterError::invalid(
            key,
            format!("'{token}' is not a range token"),
        ))
    }

    /// Service digits converted to caller units.
    fn caller_amount(&self, key: &str, digits: &str, original: &str) -> Result<f64, FilterError> {
        if self.places == 0 {
            return parse_amount(key, digits, original);
        }
        shift_decimal(digits.trim(), self.places)
            .map(Number::as_f64)
            .filter(|value| value.is_finite())
            .ok_or_else(|| {
                FilterError::invalid(
                    key,
                    format!("'{original}' is neither a number nor a range token"),
                )
            })
    }
}

fn parse_amount(key: &str, digits: &str, original: &str) -> Result<f64, FilterError> {
    digits
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            FilterError::invalid(key, format!("'{original}' is neither a number nor a range token"))
        })
}

fn checked(key: &str, value: f64) -> Result<f64, FilterError> {
    check_bound(key, value).map(|()| value)
}

/// Integers without a fractional part, everything else in shortest form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
