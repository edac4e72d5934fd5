use serde::Deserialize;
use time::Date;

use super::value::Bound;
use crate::error::FilterError;

/// Caller adjustments to an intent's default filters.
///
/// Every field is optional; a present value replaces the default for that
/// filter and absent fields keep it. Empty strings and empty lists count as
/// absent. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Market cap class such as `smallover`, or a literal range like `2to10`
    /// in billions.
    pub market_cap: Option<String>,
    /// Billions of dollars, the unit the service uses for custom cap ranges.
    pub market_cap_min: Option<Bound>,
    pub market_cap_max: Option<Bound>,
    /// A whole price literal: `o5`, `u10` or `5to10`.
    pub price: Option<String>,
    pub price_min: Option<Bound>,
    pub price_max: Option<Bound>,
    /// Shares traded today.
    pub volume_min: Option<Bound>,
    pub volume_max: Option<Bound>,
    /// Average daily shares.
    pub avg_volume_min: Option<Bound>,
    pub avg_volume_max: Option<Bound>,
    pub relative_volume_min: Option<Bound>,
    pub relative_volume_max: Option<Bound>,
    pub price_change_min: Option<Bound>,
    pub price_change_max: Option<Bound>,
    pub price_change_positive: Option<bool>,
    pub afterhours_change_min: Option<Bound>,
    pub afterhours_change_max: Option<Bound>,

    pub rsi_min: Option<Bound>,
    pub rsi_max: Option<Bound>,
    pub pe_min: Option<Bound>,
    pub pe_max: Option<Bound>,
    pub pb_min: Option<Bound>,
    pub pb_max: Option<Bound>,
    pub dividend_yield_min: Option<Bound>,
    pub dividend_yield_max: Option<Bound>,
    pub dividend_growth_min: Option<Bound>,
    pub payout_ratio_min: Option<Bound>,
    pub payout_ratio_max: Option<Bound>,
    pub roe_min: Option<Bound>,
    pub debt_equity_max: Option<Bound>,

    pub eps_growth_qoq_min: Option<Bound>,
    pub eps_growth_qoq_positive: Option<bool>,
    pub sales_growth_qoq_min: Option<Bound>,
    pub sales_growth_qoq_positive: Option<bool>,
    pub eps_revision_min: Option<Bound>,
    pub earnings_revision_positive: Option<bool>,
    pub eps_growth_5y_positive: Option<bool>,
    pub eps_growth_yoy_positive: Option<bool>,
    pub sales_growth_5y_positive: Option<bool>,

    pub volatility_min: Option<Bound>,
    pub volatility_max: Option<Bound>,
    /// Within this many percent of the 52-week high.
    pub near_52w_high: Option<Bound>,
    pub performance: Option<String>,
    pub performance_secondary: Option<String>,
    pub sma20: Option<String>,
    pub sma50: Option<String>,
    pub sma200: Option<String>,
    pub sma50_above_sma200: Option<bool>,

    pub stocks_only: Option<bool>,
    pub instrument_type: Option<String>,
    pub country: Option<String>,
    pub sectors: Option<Vec<String>>,
    pub exclude_sectors: Option<Vec<String>>,
    pub earnings_date: Option<EarningsDateInput>,

    /// Fund assets in dollars. Prefixed tokens such as `1000to` are taken in
    /// the service's millions.
    pub aum_min: Option<Bound>,
    pub aum_max: Option<Bound>,
    pub expense_ratio_max: Option<Bound>,

    pub trend_type: Option<TrendType>,
    pub sma_period: Option<String>,

    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub max_results: Option<u32>,
    pub view: Option<u16>,
}

impl Overrides {
    pub fn from_json_str(json: &str) -> Result<Self, FilterError> {
        serde_json::from_str(json).map_err(|e| FilterError::invalid("overrides", e.to_string()))
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, FilterError> {
        serde_json::from_value(value).map_err(|e| FilterError::invalid("overrides", e.to_string()))
    }
}

/// Sub-profiles of the uptrend intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    StrongUptrend,
    Breakout,
    Momentum,
}

/// Earnings date as the caller may spell it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EarningsDateInput {
    /// A window name, or two dates joined by `x`.
    One(String),
    Many(Vec<String>),
    Span { start: String, end: String },
}

/// Resolved earnings date input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EarningsDates {
    Windows(Vec<String>),
    Span { start: Date, end: Date },
}

impl EarningsDateInput {
    /// `None` when the input is blank.
    pub(crate) fn resolve(&self) -> Result<Option<EarningsDates>, FilterError> {
        match self {
            Self::One(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                match split_date_span(raw) {
                    Some((start, end)) => span(start, end).map(Some),
                    None => Ok(Some(EarningsDates::Windows(vec![raw.to_owned()]))),
                }
            }
            Self::Many(values) => {
                let windows: Vec<String> = values
                    .iter()
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .map(str::to_owned)
                    .collect();
                Ok((!windows.is_empty()).then_some(EarningsDates::Windows(windows)))
            }
            Self::Span { start, end } => span(start, end).map(Some),
        }
    }
}

fn span(start: &str, end: &str) -> Result<EarningsDates, FilterError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        return Err(FilterError::invalid(
            "earnings_date",
            "start date is after end date",
        ));
    }
    Ok(EarningsDates::Span { start, end })
}

/// `a x b` where both sides look like dates.
fn split_date_span(raw: &str) -> Option<(&str, &str)> {
    let (start, end) = raw.split_once('x')?;
    let looks_like_date = |value: &str| {
        let value = value.trim();
        !value.is_empty()
            && value.chars().all(|ch| ch.is_ascii_digit() || ch == '-' || ch == '/')
    };
    (looks_like_date(start) && looks_like_date(end)).then_some((start, end))
}

/// Accepts `YYYY-MM-DD`, `MM-DD-YYYY` and `MM/DD/YYYY`.
pub(crate) fn parse_date(raw: &str) -> Result<Date, FilterError> {
    let raw = raw.trim();
    let invalid = || {
        FilterError::invalid(
            "earnings_date",
            format!("'{raw}' is not a date (use YYYY-MM-DD, MM-DD-YYYY or MM/DD/YYYY)"),
        )
    };

    let parts: Vec<&str> = raw.split(['-', '/']).collect();
    let [first, second, third] = parts.as_slice() else {
        return Err(invalid());
    };
    let number = |part: &str| part.parse::<u32>().map_err(|_| invalid());

    let (year, month, day) = if first.len() == 4 && !raw.contains('/') {
        (number(*first)?, number(*second)?, number(*third)?)
    } else if third.len() == 4 {
        (number(*third)?, number(*first)?, number(*second)?)
    } else {
        return Err(invalid());
    };

    let year = i32::try_from(year).map_err(|_| invalid())?;
    let month = u8::try_from(month)
        .ok()
        .and_then(|month| time::Month::try_from(month).ok())
        .ok_or_else(invalid)?;
    let day = u8::try_from(day).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;

    #[test]
    fn deserializes_numbers_tokens_and_flags() {
        let overrides = Overrides::from_json_str(
            r#"{"price_min": 5, "avg_volume_min": "o500", "stocks_only": true, "sectors": ["Energy"]}"#,
        )
        .expect("overrides");

        assert_eq!(overrides.price_min, Some(Bound::Number(5.0)));
        assert_eq!(overrides.avg_volume_min, Some(Bound::Token(String::from("o500"))));
        assert_eq!(overrides.stocks_only, Some(true));
        assert_eq!(overrides.sectors, Some(vec![String::from("Energy")]));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Overrides::from_json_str(r#"{"price_minimum": 5}"#).expect_err("must fail");

        assert_eq!(err.key(), "overrides");
        assert!(err.to_string().contains("price_minimum"));
    }

    #[test]
    fn trend_type_is_a_closed_set() {
        assert!(Overrides::from_json_str(r#"{"trend_type": "breakout"}"#).is_ok());
        assert!(Overrides::from_json_str(r#"{"trend_type": "sideways"}"#).is_err());
    }

    #[test]
    fn earnings_date_accepts_three_shapes() {
        let one = EarningsDateInput::One(String::from("this_week")).resolve().expect("ok");
        assert_eq!(one, Some(EarningsDates::Windows(vec![String::from("this_week")])));

        let span_literal = EarningsDateInput::One(String::from("2024-07-01x07/05/2024"))
            .resolve()
            .expect("ok");
        assert_eq!(
            span_literal,
            Some(EarningsDates::Span {
                start: Date::from_calendar_date(2024, Month::July, 1).expect("date"),
                end: Date::from_calendar_date(2024, Month::July, 5).expect("date"),
            })
        );

        let blank = EarningsDateInput::Many(vec![String::from(" ")]).resolve().expect("ok");
        assert_eq!(blank, None);
    }

    #[test]
    fn next_five_days_window_is_not_mistaken_for_a_span() {
        let resolved = EarningsDateInput::One(String::from("nextdays5")).resolve().expect("ok");

        assert_eq!(resolved, Some(EarningsDates::Windows(vec![String::from("nextdays5")])));
    }

    #[test]
    fn dates_are_validated_against_the_calendar() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("02-30-2024").is_err());
        assert!(parse_date("13/01/2024").is_err());
        assert!(parse_date("yesterday").is_err());
        assert!(EarningsDateInput::Span {
            start: String::from("2024-07-05"),
            end: String::from("2024-07-01"),
        }
        .resolve()
        .is_err());
    }
}
