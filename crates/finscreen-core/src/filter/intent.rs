use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::key::FilterKey;
use super::overrides::{EarningsDates, Overrides, TrendType};
use super::spec::{FilterSpec, SortField, SortOrder, SortSpec};
use super::value::{Bound, FilterValue, RangeValue};
use super::vocab::{
    TokenTable, COUNTRIES, EARNINGS_WINDOWS, INSTRUMENTS, MARKET_CAP, PERFORMANCE_WINDOWS,
    SECTORS, SMA_POSITIONS,
};
use crate::error::FilterError;

/// Named screening profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenerIntent {
    Earnings,
    VolumeSurge,
    Uptrend,
    DividendGrowth,
    Etf,
    EarningsPremarket,
    EarningsAfterhours,
    EarningsTrading,
    EarningsPositiveSurprise,
    EarningsWinners,
    UpcomingEarnings,
    TrendReversion,
    RelativeVolume,
    TechnicalAnalysis,
}

impl ScreenerIntent {
    pub const ALL: [Self; 14] = [
        Self::Earnings,
        Self::VolumeSurge,
        Self::Uptrend,
        Self::DividendGrowth,
        Self::Etf,
        Self::EarningsPremarket,
        Self::EarningsAfterhours,
        Self::EarningsTrading,
        Self::EarningsPositiveSurprise,
        Self::EarningsWinners,
        Self::UpcomingEarnings,
        Self::TrendReversion,
        Self::RelativeVolume,
        Self::TechnicalAnalysis,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Earnings => "earnings",
            Self::VolumeSurge => "volume_surge",
            Self::Uptrend => "uptrend",
            Self::DividendGrowth => "dividend_growth",
            Self::Etf => "etf",
            Self::EarningsPremarket => "earnings_premarket",
            Self::EarningsAfterhours => "earnings_afterhours",
            Self::EarningsTrading => "earnings_trading",
            Self::EarningsPositiveSurprise => "earnings_positive_surprise",
            Self::EarningsWinners => "earnings_winners",
            Self::UpcomingEarnings => "upcoming_earnings",
            Self::TrendReversion => "trend_reversion",
            Self::RelativeVolume => "relative_volume",
            Self::TechnicalAnalysis => "technical_analysis",
        }
    }

    pub fn profile(self) -> &'static Profile {
        match self {
            Self::Earnings => &EARNINGS,
            Self::VolumeSurge => &VOLUME_SURGE,
            Self::Uptrend => &UPTREND,
            Self::DividendGrowth => &DIVIDEND_GROWTH,
            Self::Etf => &ETF,
            Self::EarningsPremarket => &EARNINGS_PREMARKET,
            Self::EarningsAfterhours => &EARNINGS_AFTERHOURS,
            Self::EarningsTrading => &EARNINGS_TRADING,
            Self::EarningsPositiveSurprise => &EARNINGS_POSITIVE_SURPRISE,
            Self::EarningsWinners => &EARNINGS_WINNERS,
            Self::UpcomingEarnings => &UPCOMING_EARNINGS,
            Self::TrendReversion => &TREND_REVERSION,
            Self::RelativeVolume => &RELATIVE_VOLUME,
            Self::TechnicalAnalysis => &TECHNICAL_ANALYSIS,
        }
    }
}

impl Display for ScreenerIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenerIntent {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == wanted)
            .ok_or_else(|| FilterError::invalid("intent", format!("unknown screener '{wanted}'")))
    }
}

/// A default filter value in caller units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Min(f64),
    Max(f64),
    Token(&'static str),
    Flag,
    List(&'static [&'static str]),
    Number(f64),
}

/// Immutable defaults owned by one intent.
#[derive(Debug)]
pub struct Profile {
    pub filters: &'static [(FilterKey, DefaultValue)],
    pub sort: SortSpec,
    pub max_results: u32,
}

impl Profile {
    fn defaults(&self) -> Result<BTreeMap<FilterKey, FilterValue>, FilterError> {
        self.filters
            .iter()
            .map(|(key, value)| Ok((*key, default_value(*key, *value)?)))
            .collect()
    }
}

fn default_value(key: FilterKey, value: DefaultValue) -> Result<FilterValue, FilterError> {
    Ok(match value {
        DefaultValue::Min(min) => FilterValue::Range(RangeValue::at_least(key.name(), min)?),
        DefaultValue::Max(max) => FilterValue::Range(RangeValue::at_most(key.name(), max)?),
        DefaultValue::Token(token) => FilterValue::Token(token.to_owned()),
        DefaultValue::Flag => FilterValue::Flag,
        DefaultValue::List(tokens) => {
            FilterValue::List(tokens.iter().map(|token| (*token).to_owned()).collect())
        }
        DefaultValue::Number(number) => FilterValue::Number(number),
    })
}

use self::DefaultValue::{Flag, List, Max, Min, Token};

const fn sort(field: SortField, order: SortOrder) -> SortSpec {
    SortSpec::new(field, order)
}

const EARNINGS_WINNER_SECTORS: &[&str] = &[
    "technology",
    "industrials",
    "healthcare",
    "communicationservices",
    "consumercyclical",
    "financial",
];

const UPCOMING_EARNINGS_SECTORS: &[&str] = &[
    "technology",
    "industrials",
    "healthcare",
    "communicationservices",
    "consumercyclical",
    "financial",
    "consumerdefensive",
    "basicmaterials",
];

static EARNINGS: Profile = Profile {
    filters: &[(FilterKey::EarningsDate, List(&["thisweek"]))],
    sort: sort(SortField::EarningsDate, SortOrder::Asc),
    max_results: 100,
};

static VOLUME_SURGE: Profile = Profile {
    filters: &[
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::Instrument, Token("stocksonly")),
        (FilterKey::AvgVolume, Min(100_000.0)),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::RelativeVolume, Min(1.5)),
        (FilterKey::PriceChange, Min(2.0)),
        (FilterKey::Sma200, Token("pa")),
    ],
    sort: sort(SortField::PriceChange, SortOrder::Desc),
    max_results: 50,
};

static UPTREND: Profile = Profile {
    filters: &[
        (FilterKey::MarketCap, Token("microover")),
        (FilterKey::AvgVolume, Min(100_000.0)),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::Near52wHigh, DefaultValue::Number(30.0)),
        (FilterKey::PerformanceSecondary, Token("4wup")),
        (FilterKey::Sma20, Token("pa")),
        (FilterKey::Sma200, Token("pa")),
        (FilterKey::Sma50AboveSma200, Flag),
        (FilterKey::Instrument, Token("stocksonly")),
    ],
    sort: sort(SortField::EpsGrowthYoy, SortOrder::Desc),
    max_results: 100,
};

static DIVIDEND_GROWTH: Profile = Profile {
    filters: &[
        (FilterKey::MarketCap, Token("midover")),
        (FilterKey::DividendYield, Min(2.0)),
        (FilterKey::Eps5yPositive, Flag),
        (FilterKey::EpsGrowthQoq, Flag),
        (FilterKey::EpsYoyPositive, Flag),
        (FilterKey::Sales5yPositive, Flag),
        (FilterKey::SalesGrowthQoq, Flag),
        (FilterKey::PbRatio, Max(5.0)),
        (FilterKey::PeRatio, Max(30.0)),
        (FilterKey::Country, Token("usa")),
        (FilterKey::Instrument, Token("stocksonly")),
    ],
    sort: sort(SortField::DividendYield, SortOrder::Desc),
    max_results: 100,
};

static ETF: Profile = Profile {
    filters: &[(FilterKey::Instrument, Token("exchangetradedfund"))],
    sort: sort(SortField::Aum, SortOrder::Desc),
    max_results: 50,
};

static EARNINGS_PREMARKET: Profile = Profile {
    filters: &[
        (FilterKey::EarningsDate, List(&["todaybefore"])),
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::AvgVolume, Min(100_000.0)),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::PriceChange, Min(2.0)),
        (FilterKey::Instrument, Token("stocksonly")),
    ],
    sort: sort(SortField::PriceChange, SortOrder::Desc),
    max_results: 60,
};

static EARNINGS_AFTERHOURS: Profile = Profile {
    filters: &[
        (FilterKey::EarningsDate, List(&["todayafter"])),
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::AvgVolume, Min(100_000.0)),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::AfterhoursChange, Min(2.0)),
        (FilterKey::Instrument, Token("stocksonly")),
    ],
    sort: sort(SortField::AfterhoursChange, SortOrder::Desc),
    max_results: 60,
};

static EARNINGS_TRADING: Profile = Profile {
    filters: &[
        (FilterKey::EarningsDate, List(&["yesterdayafter", "todaybefore"])),
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::EpsRevision, Flag),
        (FilterKey::AvgVolume, Min(200_000.0)),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::PriceChange, Flag),
        (FilterKey::Performance, Token("0to-4w")),
        (FilterKey::Volatility, Min(1.0)),
    ],
    sort: sort(SortField::EpsSurprise, SortOrder::Desc),
    max_results: 60,
};

static EARNINGS_POSITIVE_SURPRISE: Profile = Profile {
    filters: &[
        (FilterKey::EarningsDate, List(&["thisweek"])),
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::AvgVolume, Min(500_000.0)),
        (FilterKey::Sma200, Token("pa")),
    ],
    sort: sort(SortField::EpsGrowthQoq, SortOrder::Desc),
    max_results: 50,
};

static EARNINGS_WINNERS: Profile = Profile {
    filters: &[
        (FilterKey::EarningsDate, List(&["thisweek"])),
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::AvgVolume, Min(500_000.0)),
        (FilterKey::EpsGrowthQoq, Min(10.0)),
        (FilterKey::EpsRevision, Min(5.0)),
        (FilterKey::SalesGrowthQoq, Min(5.0)),
        (FilterKey::Performance, Token("5to-1w")),
        (FilterKey::Sma200, Token("pa")),
        (FilterKey::Sectors, List(EARNINGS_WINNER_SECTORS)),
    ],
    sort: sort(SortField::Performance1w, SortOrder::Desc),
    max_results: 50,
};

static UPCOMING_EARNINGS: Profile = Profile {
    filters: &[
        (FilterKey::EarningsDate, List(&["nextweek"])),
        (FilterKey::MarketCap, Token("smallover")),
        (FilterKey::Price, Min(10.0)),
        (FilterKey::AvgVolume, Min(500_000.0)),
        (FilterKey::Sectors, List(UPCOMING_EARNINGS_SECTORS)),
    ],
    sort: sort(SortField::EarningsDate, SortOrder::Asc),
    max_results: 100,
};

static TREND_REVERSION: Profile = Profile {
    filters: &[(FilterKey::MarketCap, Token("midover"))],
    sort: sort(SortField::Rsi, SortOrder::Asc),
    max_results: 50,
};

static RELATIVE_VOLUME: Profile = Profile {
    filters: &[(FilterKey::RelativeVolume, Min(2.0))],
    sort: sort(SortField::RelativeVolume, SortOrder::Desc),
    max_results: 50,
};

static TECHNICAL_ANALYSIS: Profile = Profile {
    filters: &[],
    sort: sort(SortField::Ticker, SortOrder::Asc),
    max_results: 50,
};

/// Merge an intent's defaults with caller overrides into a validated spec.
///
/// Conflicting and malformed overrides are rejected here, before any request
/// is made.
pub fn build(intent: ScreenerIntent, overrides: &Overrides) -> Result<FilterSpec, FilterError> {
    check_conflicts(overrides)?;

    let profile = intent.profile();
    let mut merge = Merge {
        filters: profile.defaults()?,
    };

    match overrides.trend_type {
        Some(trend) => merge.refine_trend(intent, trend, overrides.sma_period.as_deref())?,
        None if present_str(&overrides.sma_period).is_some() => {
            tracing::debug!(
                intent = intent.as_str(),
                "sma_period ignored without trend_type"
            );
        }
        None => {}
    }

    merge.apply(overrides)?;

    let mut sort = profile.sort;
    if let Some(field) = present_str(&overrides.sort_by) {
        sort.field = field.parse()?;
    }
    if let Some(order) = present_str(&overrides.sort_order) {
        sort.order = order.parse()?;
    }

    let mut spec = FilterSpec::new()
        .with_sort(sort)
        .with_max_results(overrides.max_results.unwrap_or(profile.max_results))?;
    if let Some(view) = overrides.view {
        spec = spec.with_view(view);
    }
    for (key, value) in merge.filters {
        spec.insert(key, value)?;
    }

    tracing::debug!(
        intent = intent.as_str(),
        filters = spec.len(),
        max_results = spec.max_results(),
        "filter spec built"
    );
    Ok(spec)
}

fn present_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn present_bound(value: &Option<Bound>) -> Option<&Bound> {
    value.as_ref().filter(|bound| !bound.is_blank())
}

fn present_list(value: &Option<Vec<String>>) -> Option<Vec<&str>> {
    let items: Vec<&str> = value
        .iter()
        .flatten()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

fn first_present(candidates: &[(&'static str, &Option<Bound>)]) -> Option<&'static str> {
    candidates
        .iter()
        .find(|(_, bound)| present_bound(bound).is_some())
        .map(|(name, _)| *name)
}

fn check_conflicts(overrides: &Overrides) -> Result<(), FilterError> {
    let pairs = [
        (
            present_str(&overrides.price).is_some(),
            "price",
            first_present(&[
                ("price_min", &overrides.price_min),
                ("price_max", &overrides.price_max),
            ]),
        ),
        (
            present_str(&overrides.market_cap).is_some(),
            "market_cap",
            first_present(&[
                ("market_cap_min", &overrides.market_cap_min),
                ("market_cap_max", &overrides.market_cap_max),
            ]),
        ),
        (
            overrides.price_change_positive == Some(true),
            "price_change_positive",
            first_present(&[
                ("price_change_min", &overrides.price_change_min),
                ("price_change_max", &overrides.price_change_max),
            ]),
        ),
        (
            overrides.eps_growth_qoq_positive == Some(true),
            "eps_growth_qoq_positive",
            first_present(&[("eps_growth_qoq_min", &overrides.eps_growth_qoq_min)]),
        ),
        (
            overrides.sales_growth_qoq_positive == Some(true),
            "sales_growth_qoq_positive",
            first_present(&[("sales_growth_qoq_min", &overrides.sales_growth_qoq_min)]),
        ),
        (
            overrides.earnings_revision_positive == Some(true),
            "earnings_revision_positive",
            first_present(&[("eps_revision_min", &overrides.eps_revision_min)]),
        ),
    ];

    for (set, first, second) in pairs {
        if let (true, Some(second)) = (set, second) {
            return Err(FilterError::conflicting(first, second));
        }
    }

    if overrides.stocks_only == Some(true) {
        if let Some(instrument) = present_str(&overrides.instrument_type) {
            if INSTRUMENTS.find(instrument).map(|entry| entry.service) == Some("exchangetradedfund") {
                return Err(FilterError::conflicting("stocks_only", "instrument_type"));
            }
        }
    }
    Ok(())
}

struct Merge {
    filters: BTreeMap<FilterKey, FilterValue>,
}

impl Merge {
    fn refine_trend(
        &mut self,
        intent: ScreenerIntent,
        trend: TrendType,
        sma_period: Option<&str>,
    ) -> Result<(), FilterError> {
        if intent != ScreenerIntent::Uptrend {
            return Err(FilterError::invalid(
                "trend_type",
                format!("only applies to the uptrend screener, not '{intent}'"),
            ));
        }

        match trend {
            TrendType::StrongUptrend => {}
            TrendType::Breakout => {
                self.set_range(FilterKey::RelativeVolume, RangeValue::at_least("relative_volume", 1.5)?);
                self.set_range(FilterKey::PriceChange, RangeValue::at_least("price_change", 2.0)?);
            }
            TrendType::Momentum => {
                self.set_range(FilterKey::RelativeVolume, RangeValue::at_least("relative_volume", 1.0)?);
                self.filters
                    .insert(FilterKey::Performance, FilterValue::Token(String::from("13wup")));
            }
        }

        if let Some(period) = sma_period.map(str::trim).filter(|period| !period.is_empty()) {
            let key = match period.trim_start_matches("sma") {
                "20" => FilterKey::Sma20,
                "50" => FilterKey::Sma50,
                "200" => FilterKey::Sma200,
                other => {
                    return Err(FilterError::invalid(
                        "sma_period",
                        format!("'{other}' is not one of 20, 50, 200"),
                    ))
                }
            };
            self.filters.insert(key, FilterValue::Token(String::from("pa")));
        }
        Ok(())
    }

    fn apply(&mut self, o: &Overrides) -> Result<(), FilterError> {
        if let Some(market_cap) = present_str(&o.market_cap) {
            let value = match MARKET_CAP.find(market_cap) {
                Some(entry) => FilterValue::Token(entry.service.to_owned()),
                None => FilterValue::Range(self.literal(FilterKey::MarketCap, market_cap)?),
            };
            self.filters.insert(FilterKey::MarketCap, value);
        }
        self.bounds(FilterKey::MarketCap, &o.market_cap_min, &o.market_cap_max)?;

        if let Some(price) = present_str(&o.price) {
            let range = self.literal(FilterKey::Price, price)?;
            self.set_range(FilterKey::Price, range);
        }
        self.bounds(FilterKey::Price, &o.price_min, &o.price_max)?;
        self.bounds(FilterKey::Volume, &o.volume_min, &o.volume_max)?;
        self.bounds(FilterKey::AvgVolume, &o.avg_volume_min, &o.avg_volume_max)?;
        self.bounds(FilterKey::RelativeVolume, &o.relative_volume_min, &o.relative_volume_max)?;

        self.positive(FilterKey::PriceChange, o.price_change_positive);
        self.bounds(FilterKey::PriceChange, &o.price_change_min, &o.price_change_max)?;
        self.bounds(FilterKey::AfterhoursChange, &o.afterhours_change_min, &o.afterhours_change_max)?;

        self.bounds(FilterKey::Rsi, &o.rsi_min, &o.rsi_max)?;
        self.bounds(FilterKey::PeRatio, &o.pe_min, &o.pe_max)?;
        self.bounds(FilterKey::PbRatio, &o.pb_min, &o.pb_max)?;
        self.bounds(FilterKey::DividendYield, &o.dividend_yield_min, &o.dividend_yield_max)?;
        self.bounds(FilterKey::DividendGrowth, &o.dividend_growth_min, &None)?;
        self.bounds(FilterKey::PayoutRatio, &o.payout_ratio_min, &o.payout_ratio_max)?;
        self.bounds(FilterKey::Roe, &o.roe_min, &None)?;
        self.bounds(FilterKey::DebtEquity, &None, &o.debt_equity_max)?;

        self.positive(FilterKey::EpsGrowthQoq, o.eps_growth_qoq_positive);
        self.bounds(FilterKey::EpsGrowthQoq, &o.eps_growth_qoq_min, &None)?;
        self.positive(FilterKey::SalesGrowthQoq, o.sales_growth_qoq_positive);
        self.bounds(FilterKey::SalesGrowthQoq, &o.sales_growth_qoq_min, &None)?;
        self.positive(FilterKey::EpsRevision, o.earnings_revision_positive);
        self.bounds(FilterKey::EpsRevision, &o.eps_revision_min, &None)?;
        self.positive(FilterKey::Eps5yPositive, o.eps_growth_5y_positive);
        self.positive(FilterKey::EpsYoyPositive, o.eps_growth_yoy_positive);
        self.positive(FilterKey::Sales5yPositive, o.sales_growth_5y_positive);

        self.bounds(FilterKey::Volatility, &o.volatility_min, &o.volatility_max)?;
        if let Some(distance) = present_bound(&o.near_52w_high) {
            let percent = high_distance(distance)?;
            self.filters
                .insert(FilterKey::Near52wHigh, FilterValue::Number(percent));
        }
        self.token(FilterKey::Performance, &PERFORMANCE_WINDOWS, &o.performance)?;
        self.token(
            FilterKey::PerformanceSecondary,
            &PERFORMANCE_WINDOWS,
            &o.performance_secondary,
        )?;
        self.token(FilterKey::Sma20, &SMA_POSITIONS, &o.sma20)?;
        self.token(FilterKey::Sma50, &SMA_POSITIONS, &o.sma50)?;
        self.token(FilterKey::Sma200, &SMA_POSITIONS, &o.sma200)?;
        self.positive(FilterKey::Sma50AboveSma200, o.sma50_above_sma200);

        match o.stocks_only {
            Some(true) => {
                self.filters
                    .insert(FilterKey::Instrument, FilterValue::Token(String::from("stocksonly")));
            }
            Some(false) => {
                let stocks_only = matches!(
                    self.filters.get(&FilterKey::Instrument),
                    Some(FilterValue::Token(t)) if t == "stocksonly"
                );
                if stocks_only {
                    self.filters.remove(&FilterKey::Instrument);
                }
            }
            None => {}
        }
        self.token(FilterKey::Instrument, &INSTRUMENTS, &o.instrument_type)?;
        self.token(FilterKey::Country, &COUNTRIES, &o.country)?;
        self.sectors(o)?;

        if let Some(input) = &o.earnings_date {
            match input.resolve()? {
                Some(EarningsDates::Windows(windows)) => {
                    let tokens = windows
                        .iter()
                        .map(|window| {
                            EARNINGS_WINDOWS
                                .resolve("earnings_date", window)
                                .map(|entry| entry.service.to_owned())
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    self.filters
                        .insert(FilterKey::EarningsDate, FilterValue::List(dedup(tokens)));
                }
                Some(EarningsDates::Span { start, end }) => {
                    self.filters
                        .insert(FilterKey::EarningsDate, FilterValue::DateRange { start, end });
                }
                None => {}
            }
        }

        self.bounds(FilterKey::Aum, &o.aum_min, &o.aum_max)?;
        self.bounds(FilterKey::ExpenseRatio, &None, &o.expense_ratio_max)?;
        Ok(())
    }

    fn set_range(&mut self, key: FilterKey, range: RangeValue) {
        self.filters.insert(key, FilterValue::Range(range));
    }

    fn literal(&self, key: FilterKey, token: &str) -> Result<RangeValue, FilterError> {
        key.range_encoding()
            .ok_or_else(|| FilterError::invalid(key.name(), "does not take a range"))?
            .literal(key.name(), token)
    }

    /// Per-side merge: a supplied side replaces that side of the current range;
    /// a current value of another kind is replaced outright.
    fn bounds(
        &mut self,
        key: FilterKey,
        min: &Option<Bound>,
        max: &Option<Bound>,
    ) -> Result<(), FilterError> {
        let (min, max) = (present_bound(min), present_bound(max));
        if min.is_none() && max.is_none() {
            return Ok(());
        }
        let encoding = key
            .range_encoding()
            .ok_or_else(|| FilterError::invalid(key.name(), "does not take a range"))?;

        let (current_min, current_max) = match self.filters.get(&key) {
            Some(FilterValue::Range(range)) => (range.min(), range.max()),
            _ => (None, None),
        };
        let new_min = match min {
            Some(bound) => Some(encoding.min_from(&format!("{}_min", key.name()), bound)?),
            None => current_min,
        };
        let new_max = match max {
            Some(bound) => Some(encoding.max_from(&format!("{}_max", key.name()), bound)?),
            None => current_max,
        };
        let range = RangeValue::new(key.name(), new_min, new_max)?;
        self.set_range(key, range);
        Ok(())
    }

    /// `true` sets the flag; `false` clears it but leaves a numeric range.
    fn positive(&mut self, key: FilterKey, value: Option<bool>) {
        match value {
            Some(true) => {
                self.filters.insert(key, FilterValue::Flag);
            }
            Some(false) => {
                if matches!(self.filters.get(&key), Some(FilterValue::Flag)) {
                    self.filters.remove(&key);
                }
            }
            None => {}
        }
    }

    fn token(
        &mut self,
        key: FilterKey,
        table: &TokenTable,
        value: &Option<String>,
    ) -> Result<(), FilterError> {
        if let Some(raw) = present_str(value) {
            let entry = table.resolve(key.name(), raw)?;
            self.filters
                .insert(key, FilterValue::Token(entry.service.to_owned()));
        }
        Ok(())
    }

    fn sectors(&mut self, o: &Overrides) -> Result<(), FilterError> {
        let resolve_all = |key: &str, names: &[&str]| {
            names
                .iter()
                .map(|name| SECTORS.resolve(key, name).map(|entry| entry.service.to_owned()))
                .collect::<Result<Vec<_>, _>>()
        };

        let chosen = present_list(&o.sectors)
            .map(|names| resolve_all("sectors", &names))
            .transpose()?;

        let sectors = match present_list(&o.exclude_sectors) {
            Some(names) => {
                let excluded = resolve_all("exclude_sectors", &names)?;
                let base = chosen.unwrap_or_else(|| SECTORS.services().map(str::to_owned).collect());
                let remaining: Vec<String> = base
                    .into_iter()
                    .filter(|sector| !excluded.contains(sector))
                    .collect();
                if remaining.is_empty() {
                    return Err(FilterError::invalid(
                        "exclude_sectors",
                        "excluding these sectors leaves nothing to screen",
                    ));
                }
                Some(remaining)
            }
            None => chosen,
        };

        if let Some(sectors) = sectors {
            self.filters
                .insert(FilterKey::Sectors, FilterValue::List(dedup(sectors)));
        }
        Ok(())
    }
}

fn high_distance(bound: &Bound) -> Result<f64, FilterError> {
    let percent = match bound {
        Bound::Number(value) => *value,
        Bound::Token(token) => {
            let token = token.trim();
            let digits = token.strip_prefix('a').unwrap_or(token);
            let digits = digits.strip_suffix('h').unwrap_or(digits);
            digits.parse::<f64>().map_err(|_| {
                FilterError::invalid(
                    "near_52w_high",
                    format!("'{token}' is neither a percentage nor a token like 'a30h'"),
                )
            })?
        }
    };
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(FilterError::invalid(
            "near_52w_high",
            "distance must be between 0 and 100 percent",
        ));
    }
    Ok(percent)
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
