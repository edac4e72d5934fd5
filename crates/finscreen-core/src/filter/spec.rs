use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::key::FilterKey;
use super::value::FilterValue;
use crate::error::FilterError;

pub const MAX_RESULTS_LIMIT: u32 = 1000;
pub const SCREEN_VIEW: u16 = 151;
pub const FUNDAMENTALS_VIEW: u16 = 152;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(FilterError::invalid(
                "sort_order",
                format!("'{other}' is not 'asc' or 'desc'"),
            )),
        }
    }
}

/// Columns a screen can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Ticker,
    Price,
    PriceChange,
    AfterhoursChange,
    Volume,
    RelativeVolume,
    MarketCap,
    Pe,
    DividendYield,
    Rsi,
    Sma200,
    Performance1w,
    EpsGrowthYoy,
    EpsGrowthQoq,
    EpsSurprise,
    EarningsDate,
    Aum,
}

impl SortField {
    pub const ALL: [Self; 17] = [
        Self::Ticker,
        Self::Price,
        Self::PriceChange,
        Self::AfterhoursChange,
        Self::Volume,
        Self::RelativeVolume,
        Self::MarketCap,
        Self::Pe,
        Self::DividendYield,
        Self::Rsi,
        Self::Sma200,
        Self::Performance1w,
        Self::EpsGrowthYoy,
        Self::EpsGrowthQoq,
        Self::EpsSurprise,
        Self::EarningsDate,
        Self::Aum,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Price => "price",
            Self::PriceChange => "price_change",
            Self::AfterhoursChange => "afterhours_change",
            Self::Volume => "volume",
            Self::RelativeVolume => "relative_volume",
            Self::MarketCap => "market_cap",
            Self::Pe => "pe",
            Self::DividendYield => "dividend_yield",
            Self::Rsi => "rsi",
            Self::Sma200 => "sma200",
            Self::Performance1w => "performance_1w",
            Self::EpsGrowthYoy => "eps_growth_yoy",
            Self::EpsGrowthQoq => "eps_growth_qoq",
            Self::EpsSurprise => "eps_surprise",
            Self::EarningsDate => "earnings_date",
            Self::Aum => "aum",
        }
    }

    /// Column code used by the `o=` parameter.
    pub const fn service_code(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Price => "price",
            Self::PriceChange => "change",
            Self::AfterhoursChange => "afterchange",
            Self::Volume => "volume",
            Self::RelativeVolume => "relvol",
            Self::MarketCap => "marketcap",
            Self::Pe => "pe",
            Self::DividendYield => "dividendyield",
            Self::Rsi => "rsi",
            Self::Sma200 => "sma200",
            Self::Performance1w => "perf1w",
            Self::EpsGrowthYoy => "epsyoy1",
            Self::EpsGrowthQoq => "epsqoq",
            Self::EpsSurprise => "epssurprise",
            Self::EarningsDate => "earningsdate",
            Self::Aum => "aum",
        }
    }

    pub fn from_service_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.service_code() == code)
    }
}

impl FromStr for SortField {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == wanted || field.service_code() == wanted)
            .ok_or_else(|| {
                FilterError::invalid(
                    "sort_by",
                    format!(
                        "'{wanted}' is not a sortable field; expected one of: {}",
                        Self::ALL.map(Self::name).join(", ")
                    ),
                )
            })
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// `o=` value: the column code, prefixed with `-` when descending.
    pub fn service_value(&self) -> String {
        match self.order {
            SortOrder::Asc => self.field.service_code().to_owned(),
            SortOrder::Desc => format!("-{}", self.field.service_code()),
        }
    }

    pub fn parse_service_value(value: &str) -> Option<Self> {
        match value.strip_prefix('-') {
            Some(code) => SortField::from_service_code(code).map(|f| Self::new(f, SortOrder::Desc)),
            None => SortField::from_service_code(value).map(|f| Self::new(f, SortOrder::Asc)),
        }
    }
}

/// Canonical, validated screening request.
///
/// Every stored value has been checked against its key, so compiling a spec
/// cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    filters: BTreeMap<FilterKey, FilterValue>,
    sort: Option<SortSpec>,
    max_results: u32,
    view: u16,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            sort: None,
            max_results: 100,
            view: SCREEN_VIEW,
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, key: FilterKey, value: FilterValue) -> Result<Self, FilterError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn insert(&mut self, key: FilterKey, value: FilterValue) -> Result<(), FilterError> {
        key.check(&value)?;
        self.filters.insert(key, value);
        Ok(())
    }

    pub fn remove(&mut self, key: FilterKey) -> Option<FilterValue> {
        self.filters.remove(&key)
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Result<Self, FilterError> {
        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(FilterError::invalid(
                "max_results",
                format!("must be between 1 and {MAX_RESULTS_LIMIT}, got {max_results}"),
            ));
        }
        self.max_results = max_results;
        Ok(self)
    }

    pub fn with_view(mut self, view: u16) -> Self {
        self.view = view;
        self
    }

    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.filters.get(&key)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.filters.contains_key(&key)
    }

    /// Filters in emission order.
    pub fn filters(&self) -> impl Iterator<Item = (FilterKey, &FilterValue)> {
        self.filters.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub const fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub const fn max_results(&self) -> u32 {
        self.max_results
    }

    pub const fn view(&self) -> u16 {
        self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::RangeValue;

    #[test]
    fn sort_service_value_prefixes_descending() {
        assert_eq!(
            SortSpec::new(SortField::PriceChange, SortOrder::Desc).service_value(),
            "-change"
        );
        assert_eq!(
            SortSpec::new(SortField::EarningsDate, SortOrder::Asc).service_value(),
            "earningsdate"
        );
        assert_eq!(
            SortSpec::parse_service_value("-epsyoy1"),
            Some(SortSpec::new(SortField::EpsGrowthYoy, SortOrder::Desc))
        );
    }

    #[test]
    fn sort_field_accepts_names_and_codes() {
        assert_eq!("relative_volume".parse::<SortField>(), Ok(SortField::RelativeVolume));
        assert_eq!("RELVOL".parse::<SortField>(), Ok(SortField::RelativeVolume));
        assert!("shoe_size".parse::<SortField>().is_err());
        assert_eq!(" Desc ".parse::<SortOrder>(), Ok(SortOrder::Desc));
    }

    #[test]
    fn max_results_is_bounded() {
        assert!(FilterSpec::new().with_max_results(0).is_err());
        assert!(FilterSpec::new().with_max_results(1001).is_err());
        assert_eq!(
            FilterSpec::new().with_max_results(1000).map(|spec| spec.max_results()),
            Ok(1000)
        );
    }

    #[test]
    fn insert_validates_against_the_key() {
        let spec = FilterSpec::new()
            .with_filter(
                FilterKey::Price,
                FilterValue::Range(RangeValue::at_least("price", 10.0).expect("range")),
            )
            .expect("valid");

        assert!(spec.contains(FilterKey::Price));
        assert!(spec
            .clone()
            .with_filter(FilterKey::Price, FilterValue::Token(String::from("o10")))
            .is_err());
    }

    #[test]
    fn filters_iterate_in_key_order() {
        let spec = FilterSpec::new()
            .with_filter(FilterKey::Sma200, FilterValue::Token(String::from("pa")))
            .and_then(|spec| spec.with_filter(FilterKey::MarketCap, FilterValue::Token(String::from("smallover"))))
            .expect("valid");

        let keys: Vec<FilterKey> = spec.filters().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![FilterKey::MarketCap, FilterKey::Sma200]);
    }
}
