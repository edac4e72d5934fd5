use std::fmt::{Display, Formatter};

use super::value::{FilterValue, RangeEncoding, RangeValue};
use super::vocab::{
    TokenTable, COUNTRIES, EARNINGS_WINDOWS, INSTRUMENTS, MARKET_CAP, PERFORMANCE_WINDOWS,
    SECTORS, SMA_POSITIONS,
};
use crate::error::FilterError;

/// Canonical screening filter.
///
/// Variants are declared in alphabetical order of their service field, and
/// that order is the emission order of the compiled `f=` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    AfterhoursChange,
    MarketCap,
    EarningsDate,
    Aum,
    ExpenseRatio,
    DebtEquity,
    DividendYield,
    DividendGrowth,
    Eps5yPositive,
    EpsGrowthQoq,
    EpsRevision,
    EpsYoyPositive,
    PayoutRatio,
    PbRatio,
    PeRatio,
    Roe,
    Sales5yPositive,
    SalesGrowthQoq,
    Country,
    Instrument,
    Sectors,
    AvgVolume,
    Volume,
    Price,
    RelativeVolume,
    PriceChange,
    Near52wHigh,
    Performance,
    PerformanceSecondary,
    Rsi,
    Sma20,
    Sma200,
    Sma50,
    Sma50AboveSma200,
    Volatility,
}

/// The value forms a key accepts and how they are spelled.
#[derive(Debug, Clone, Copy)]
pub enum FilterShape {
    Range(RangeEncoding),
    Token(&'static TokenTable),
    /// A closed-vocabulary class or a numeric range (market cap).
    TokenOrRange(&'static TokenTable, RangeEncoding),
    /// One or more tokens joined with `|`.
    List(&'static TokenTable),
    /// Earnings windows, or an explicit `MM-DD-YYYYxMM-DD-YYYY` span.
    Dates,
    /// A fixed token with no value of its own.
    Flag(&'static str),
    /// A range, or the fixed token meaning "positive".
    RangeOrFlag(RangeEncoding, &'static str),
    /// Within `n` percent below the 52-week high: `a{n}h`.
    HighDistance,
}

impl FilterKey {
    pub const ALL: [Self; 35] = [
        Self::AfterhoursChange,
        Self::MarketCap,
        Self::EarningsDate,
        Self::Aum,
        Self::ExpenseRatio,
        Self::DebtEquity,
        Self::DividendYield,
        Self::DividendGrowth,
        Self::Eps5yPositive,
        Self::EpsGrowthQoq,
        Self::EpsRevision,
        Self::EpsYoyPositive,
        Self::PayoutRatio,
        Self::PbRatio,
        Self::PeRatio,
        Self::Roe,
        Self::Sales5yPositive,
        Self::SalesGrowthQoq,
        Self::Country,
        Self::Instrument,
        Self::Sectors,
        Self::AvgVolume,
        Self::Volume,
        Self::Price,
        Self::RelativeVolume,
        Self::PriceChange,
        Self::Near52wHigh,
        Self::Performance,
        Self::PerformanceSecondary,
        Self::Rsi,
        Self::Sma20,
        Self::Sma200,
        Self::Sma50,
        Self::Sma50AboveSma200,
        Self::Volatility,
    ];

    /// Caller-facing name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AfterhoursChange => "afterhours_change",
            Self::MarketCap => "market_cap",
            Self::EarningsDate => "earnings_date",
            Self::Aum => "aum",
            Self::ExpenseRatio => "expense_ratio",
            Self::DebtEquity => "debt_equity",
            Self::DividendYield => "dividend_yield",
            Self::DividendGrowth => "dividend_growth",
            Self::Eps5yPositive => "eps_growth_5y_positive",
            Self::EpsGrowthQoq => "eps_growth_qoq",
            Self::EpsRevision => "eps_revision",
            Self::EpsYoyPositive => "eps_growth_yoy_positive",
            Self::PayoutRatio => "payout_ratio",
            Self::PbRatio => "pb",
            Self::PeRatio => "pe",
            Self::Roe => "roe",
            Self::Sales5yPositive => "sales_growth_5y_positive",
            Self::SalesGrowthQoq => "sales_growth_qoq",
            Self::Country => "country",
            Self::Instrument => "instrument_type",
            Self::Sectors => "sectors",
            Self::AvgVolume => "avg_volume",
            Self::Volume => "volume",
            Self::Price => "price",
            Self::RelativeVolume => "relative_volume",
            Self::PriceChange => "price_change",
            Self::Near52wHigh => "near_52w_high",
            Self::Performance => "performance",
            Self::PerformanceSecondary => "performance_secondary",
            Self::Rsi => "rsi",
            Self::Sma20 => "sma20",
            Self::Sma200 => "sma200",
            Self::Sma50 => "sma50",
            Self::Sma50AboveSma200 => "sma50_above_sma200",
            Self::Volatility => "volatility",
        }
    }

    /// Service field prefix written before `_<value>`.
    pub const fn service_field(self) -> &'static str {
        match self {
            Self::AfterhoursChange => "ah_change",
            Self::MarketCap => "cap",
            Self::EarningsDate => "earningsdate",
            Self::Aum => "etf_aum",
            Self::ExpenseRatio => "etf_netexpense",
            Self::DebtEquity => "fa_debteq",
            Self::DividendYield => "fa_div",
            Self::DividendGrowth => "fa_divgrowth",
            Self::Eps5yPositive => "fa_eps5years",
            Self::EpsGrowthQoq => "fa_epsqoq",
            Self::EpsRevision => "fa_epsrev",
            Self::EpsYoyPositive => "fa_epsyoy",
            Self::PayoutRatio => "fa_payoutratio",
            Self::PbRatio => "fa_pb",
            Self::PeRatio => "fa_pe",
            Self::Roe => "fa_roe",
            Self::Sales5yPositive => "fa_sales5years",
            Self::SalesGrowthQoq => "fa_salesqoq",
            Self::Country => "geo",
            Self::Instrument => "ind",
            Self::Sectors => "sec",
            Self::AvgVolume => "sh_avgvol",
            Self::Volume => "sh_curvol",
            Self::Price => "sh_price",
            Self::RelativeVolume => "sh_relvol",
            Self::PriceChange => "ta_change",
            Self::Near52wHigh => "ta_highlow52w",
            Self::Performance => "ta_perf",
            Self::PerformanceSecondary => "ta_perf2",
            Self::Rsi => "ta_rsi",
            Self::Sma20 => "ta_sma20",
            Self::Sma200 => "ta_sma200",
            Self::Sma50 | Self::Sma50AboveSma200 => "ta_sma50",
            Self::Volatility => "ta_volatility",
        }
    }

    pub const fn shape(self) -> FilterShape {
        use FilterShape::{Dates, Flag, HighDistance, List, Range, RangeOrFlag, Token, TokenOrRange};

        const PRESET: RangeEncoding = RangeEncoding::PRESET;
        const CUSTOM: RangeEncoding = RangeEncoding::CUSTOM;

        match self {
            Self::AfterhoursChange => Range(CUSTOM.over("u")),
            Self::MarketCap => TokenOrRange(&MARKET_CAP, CUSTOM),
            Self::EarningsDate => Dates,
            Self::Aum => Range(CUSTOM.shifted(6)),
            Self::ExpenseRatio => Range(CUSTOM),
            Self::DebtEquity => Range(PRESET),
            Self::DividendYield => Range(CUSTOM),
            Self::DividendGrowth => Range(CUSTOM),
            Self::Eps5yPositive | Self::EpsYoyPositive | Self::Sales5yPositive => Flag("pos"),
            Self::EpsGrowthQoq | Self::SalesGrowthQoq => RangeOrFlag(PRESET, "pos"),
            Self::EpsRevision => RangeOrFlag(CUSTOM.over("eo"), "ep"),
            Self::PayoutRatio | Self::PbRatio | Self::PeRatio | Self::Roe => Range(PRESET),
            Self::Country => Token(&COUNTRIES),
            Self::Instrument => Token(&INSTRUMENTS),
            Self::Sectors => List(&SECTORS),
            Self::AvgVolume => Range(PRESET.shifted(3)),
            Self::Volume => Range(CUSTOM.shifted(3)),
            Self::Price | Self::RelativeVolume => Range(PRESET),
            Self::PriceChange => RangeOrFlag(CUSTOM.over("u"), "u"),
            Self::Near52wHigh => HighDistance,
            Self::Performance | Self::PerformanceSecondary => Token(&PERFORMANCE_WINDOWS),
            Self::Rsi => Range(CUSTOM),
            Self::Sma20 | Self::Sma200 | Self::Sma50 => Token(&SMA_POSITIONS),
            Self::Sma50AboveSma200 => Flag("sa200"),
            Self::Volatility => Range(CUSTOM.open_end("x")),
        }
    }

    /// Range encoding, when the key accepts ranges at all.
    pub const fn range_encoding(self) -> Option<RangeEncoding> {
        match self.shape() {
            FilterShape::Range(encoding)
            | FilterShape::TokenOrRange(_, encoding)
            | FilterShape::RangeOrFlag(encoding, _) => Some(encoding),
            _ => None,
        }
    }

    /// Check that `value` is a form this key accepts.
    pub fn check(self, value: &FilterValue) -> Result<(), FilterError> {
        let key = self.name();
        let token_in = |table: &TokenTable, token: &str| {
            if table.by_service(token).is_some() {
                Ok(())
            } else {
                Err(FilterError::invalid(
                    key,
                    format!("'{token}' is not a valid {}", table.label),
                ))
            }
        };

        match (self.shape(), value) {
            (
                FilterShape::Range(_) | FilterShape::TokenOrRange(..) | FilterShape::RangeOrFlag(..),
                FilterValue::Range(range),
            ) => RangeValue::new(key, range.min(), range.max()).map(|_| ()),
            (FilterShape::Token(table) | FilterShape::TokenOrRange(table, _), FilterValue::Token(token)) => {
                token_in(table, token)
            }
            (shape @ (FilterShape::List(_) | FilterShape::Dates), FilterValue::List(tokens)) => {
                let table = match shape {
                    FilterShape::List(table) => table,
                    _ => &EARNINGS_WINDOWS,
                };
                if tokens.is_empty() {
                    return Err(FilterError::invalid(key, "list must not be empty"));
                }
                tokens.iter().try_for_each(|token| token_in(table, token))
            }
            (FilterShape::Dates, FilterValue::DateRange { start, end }) => {
                if start > end {
                    Err(FilterError::invalid(key, "start date is after end date"))
                } else {
                    Ok(())
                }
            }
            (FilterShape::Flag(_) | FilterShape::RangeOrFlag(..), FilterValue::Flag) => Ok(()),
            (FilterShape::HighDistance, FilterValue::Number(percent)) => {
                if percent.is_finite() && (0.0..=100.0).contains(percent) {
                    Ok(())
                } else {
                    Err(FilterError::invalid(key, "distance must be between 0 and 100 percent"))
                }
            }
            (_, other) => Err(FilterError::invalid(
                key,
                format!("a {} value is not accepted here", other.kind()),
            )),
        }
    }

    /// Keys sharing a service field, in the order they claim values.
    pub fn for_service_field(field: &str) -> impl Iterator<Item = Self> + '_ {
        Self::ALL
            .into_iter()
            .filter(move |key| key.service_field() == field)
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
