//! Compile a [`FilterSpec`] into the export endpoint's query grammar.
//!
//! Filters are joined with `,` into a single `f=` parameter. Each filter is
//! `<service field>_<token>`; multi-valued filters carry the field prefix
//! once and join their tokens with `|`.

use std::fmt::{Display, Formatter};

use crate::domain::Ticker;
use crate::error::FilterError;
use crate::filter::{
    format_number, parse_date, FilterKey, FilterShape, FilterSpec, FilterValue, SortSpec,
    FUNDAMENTALS_VIEW,
};

/// Every column of the fundamentals view, in export order.
pub const FUNDAMENTALS_COLUMNS: &str = "0,1,2,79,3,4,5,129,6,7,8,9,10,11,12,13,73,74,75,14,130,131,147,148,149,15,16,77,17,18,142,19,20,143,21,23,22,132,133,82,78,127,128,144,145,146,24,25,85,26,27,28,29,30,31,84,32,33,34,35,36,37,38,39,40,41,90,91,92,93,94,95,96,97,98,99,42,43,44,45,47,46,138,139,140,48,49,50,51,52,53,54,55,56,57,58,134,125,126,59,68,70,80,83,76,60,61,62,63,64,67,89,69,81,86,87,88,65,66,71,72,141,135,136,137,103,100,101,104,102,106,107,108,109,110,111,112,113,114,115,116,117,118,119,120,121,122,123,124,105";

/// CSV export format code.
const EXPORT_FORMAT: &str = "4";
const REDACTED: &str = "***";

/// Ordered query parameters for one export request.
///
/// `Display` renders a URL-encoded query string with the `auth` value
/// replaced, so a `QueryParams` can be logged as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, String)>,
}

impl QueryParams {
    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.params.push((key.to_owned(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.params
    }
}

impl Display for QueryParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, (key, value)) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            let value = if key == "auth" { REDACTED } else { value.as_str() };
            write!(f, "{}={}", urlencoding::encode(key), urlencoding::encode(value))?;
        }
        Ok(())
    }
}

/// Build the screen request for `spec`.
pub fn compile(spec: &FilterSpec, auth: Option<&str>) -> QueryParams {
    let mut params = QueryParams::default();
    params.push("v", spec.view().to_string());

    let filter = compile_filter(spec);
    if !filter.is_empty() {
        params.push("f", filter);
    }
    params.push("ft", EXPORT_FORMAT);
    if let Some(sort) = spec.sort() {
        params.push("o", sort.service_value());
    }
    params.push("ar", spec.max_results().to_string());
    push_auth(&mut params, auth);

    tracing::debug!(
        view = spec.view(),
        filters = spec.len(),
        query = %params,
        "screen query compiled"
    );
    params
}

/// Build the fundamentals request for explicit tickers.
pub fn compile_fundamentals(tickers: &[Ticker], auth: Option<&str>) -> QueryParams {
    let mut params = QueryParams::default();
    params.push("v", FUNDAMENTALS_VIEW.to_string());
    params.push("ft", EXPORT_FORMAT);
    params.push("c", FUNDAMENTALS_COLUMNS);
    params.push(
        "t",
        tickers
            .iter()
            .map(Ticker::as_str)
            .collect::<Vec<_>>()
            .join(","),
    );
    push_auth(&mut params, auth);

    tracing::debug!(tickers = tickers.len(), query = %params, "fundamentals query compiled");
    params
}

fn push_auth(params: &mut QueryParams, auth: Option<&str>) {
    if let Some(auth) = auth.map(str::trim).filter(|auth| !auth.is_empty()) {
        params.push("auth", auth);
    }
}

/// The `f=` value alone: filters in key order, comma-joined.
pub fn compile_filter(spec: &FilterSpec) -> String {
    spec.filters()
        .map(|(key, value)| format!("{}_{}", key.service_field(), encode_value(key, value)))
        .collect::<Vec<_>>()
        .join(",")
}

fn encode_value(key: FilterKey, value: &FilterValue) -> String {
    match value {
        FilterValue::Range(range) => key
            .range_encoding()
            .map(|encoding| encoding.encode(range))
            .unwrap_or_default(),
        FilterValue::Token(token) => token.clone(),
        FilterValue::Flag => match key.shape() {
            FilterShape::Flag(token) | FilterShape::RangeOrFlag(_, token) => token.to_owned(),
            _ => String::new(),
        },
        FilterValue::List(tokens) => tokens.join("|"),
        FilterValue::DateRange { start, end } => format!(
            "{:02}-{:02}-{}x{:02}-{:02}-{}",
            u8::from(start.month()),
            start.day(),
            start.year(),
            u8::from(end.month()),
            end.day(),
            end.year()
        ),
        FilterValue::Number(percent) => format!("a{}h", format_number(*percent)),
    }
}

/// One `f=` group: a service field and its `|`-separated tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub field: &'static str,
    pub values: Vec<String>,
}

/// Split an emitted `f=` value back into field groups.
pub fn parse_filter_param(filter: &str) -> Result<Vec<ParsedToken>, FilterError> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(|group| {
            let field = FilterKey::ALL
                .iter()
                .map(|key| key.service_field())
                .filter(|field| {
                    group.len() > field.len()
                        && group.starts_with(field)
                        && group.as_bytes()[field.len()] == b'_'
                })
                .max_by_key(|field| field.len())
                .ok_or_else(|| {
                    FilterError::invalid("f", format!("'{group}' does not start with a known field"))
                })?;
            let values = group[field.len() + 1..]
                .split('|')
                .map(str::to_owned)
                .collect();
            Ok(ParsedToken { field, values })
        })
        .collect()
}

impl FilterSpec {
    /// Rebuild filters from an emitted `f=` value, and optionally the `o=`
    /// sort value.
    pub fn from_filter_param(filter: &str, sort: Option<&str>) -> Result<Self, FilterError> {
        let mut spec = FilterSpec::new();
        for token in parse_filter_param(filter)? {
            let (key, value) = decode_group(&token)?;
            spec.insert(key, value)?;
        }
        if let Some(sort) = sort {
            let sort = SortSpec::parse_service_value(sort)
                .ok_or_else(|| FilterError::invalid("o", format!("'{sort}' is not a sort column")))?;
            spec = spec.with_sort(sort);
        }
        Ok(spec)
    }
}

fn decode_group(token: &ParsedToken) -> Result<(FilterKey, FilterValue), FilterError> {
    let first = token.values.first().map(String::as_str).unwrap_or_default();
    // ta_sma50 carries both a position token and the sa200 flag.
    let keys: Vec<FilterKey> = FilterKey::for_service_field(token.field).collect();
    let is_flag = |key: &FilterKey| matches!(key.shape(), FilterShape::Flag(_));
    let key = keys
        .iter()
        .find(|key| matches!(key.shape(), FilterShape::Flag(flag) if flag == first))
        .or_else(|| keys.iter().find(|key| !is_flag(key)))
        .or_else(|| keys.first())
        .copied()
        .ok_or_else(|| FilterError::invalid("f", format!("unknown field '{}'", token.field)))?;

    let value = match key.shape() {
        FilterShape::Range(encoding) => FilterValue::Range(encoding.decode(key.name(), first)?),
        FilterShape::Token(_) => FilterValue::Token(first.to_owned()),
        FilterShape::TokenOrRange(table, encoding) => match table.by_service(first) {
            Some(entry) => FilterValue::Token(entry.service.to_owned()),
            None => FilterValue::Range(encoding.decode(key.name(), first)?),
        },
        FilterShape::List(_) => FilterValue::List(token.values.clone()),
        FilterShape::Dates => match first.split_once('x') {
            Some((start, end))
                if token.values.len() == 1 && start.starts_with(|c: char| c.is_ascii_digit()) =>
            {
                FilterValue::DateRange {
                    start: parse_date(start)?,
                    end: parse_date(end)?,
                }
            }
            _ => FilterValue::List(token.values.clone()),
        },
        FilterShape::Flag(_) => FilterValue::Flag,
        FilterShape::RangeOrFlag(_, flag) if first == flag => FilterValue::Flag,
        FilterShape::RangeOrFlag(encoding, _) => {
            FilterValue::Range(encoding.decode(key.name(), first)?)
        }
        FilterShape::HighDistance => {
            let digits = first.strip_prefix('a').and_then(|rest| rest.strip_suffix('h'));
            let percent = digits.and_then(|digits| digits.parse::<f64>().ok()).ok_or_else(|| {
                FilterError::invalid(key.name(), format!("'{first}' is not a distance token"))
            })?;
            FilterValue::Number(percent)
        }
    };
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use super::*;
    use crate::filter::{build, Bound, Overrides, RangeValue, ScreenerIntent};

    fn volume_surge() -> FilterSpec {
        build(ScreenerIntent::VolumeSurge, &Overrides::default()).expect("defaults are valid")
    }

    #[test]
    fn volume_surge_defaults_compile_verbatim() {
        let params = compile(&volume_surge(), Some("secret"));

        assert_eq!(
            params.get("f"),
            Some("cap_smallover,ind_stocksonly,sh_avgvol_o100,sh_price_o10,sh_relvol_o1.5,ta_change_u2,ta_sma200_pa")
        );
        assert_eq!(params.get("o"), Some("-change"));
        assert_eq!(params.get("ar"), Some("50"));
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            vec!["v", "f", "ft", "o", "ar", "auth"]
        );
    }

    #[test]
    fn display_redacts_the_api_key() {
        let params = compile(&volume_surge(), Some("secret"));
        let rendered = params.to_string();

        assert!(rendered.contains("auth=***"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.starts_with("v=151&f=cap_smallover%2Cind_stocksonly"));
        assert_eq!(params.get("auth"), Some("secret"));
    }

    #[test]
    fn blank_auth_is_omitted() {
        let params = compile(&FilterSpec::new(), Some("  "));

        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["v", "ft", "ar"]);
    }

    #[test]
    fn lists_prefix_the_field_once() {
        let spec = build(ScreenerIntent::EarningsTrading, &Overrides::default()).expect("spec");

        let filter = compile_filter(&spec);

        assert!(filter.starts_with("cap_smallover,earningsdate_yesterdayafter|todaybefore,"));
        assert!(filter.contains("fa_epsrev_ep"));
        assert!(filter.contains("ta_change_u,"));
        assert!(filter.ends_with("ta_volatility_1tox"));
    }

    #[test]
    fn numbers_and_tokens_compile_identically() {
        let numeric = Overrides {
            avg_volume_min: Some(Bound::Number(500_000.0)),
            price_max: Some(Bound::Number(50.0)),
            ..Overrides::default()
        };
        let tokens = Overrides {
            avg_volume_min: Some(Bound::from("o500")),
            price_max: Some(Bound::from("to50")),
            ..Overrides::default()
        };

        let a = build(ScreenerIntent::VolumeSurge, &numeric).expect("spec");
        let b = build(ScreenerIntent::VolumeSurge, &tokens).expect("spec");

        assert_eq!(compile_filter(&a), compile_filter(&b));
        assert!(compile_filter(&a).contains("sh_price_10to50"));
    }

    #[test]
    fn scaled_fields_emit_service_units() {
        let spec = FilterSpec::new()
            .with_filter(
                FilterKey::Aum,
                FilterValue::Range(RangeValue::at_least("aum", 1_000_000_000.0).expect("range")),
            )
            .and_then(|spec| {
                spec.with_filter(
                    FilterKey::Volume,
                    FilterValue::Range(RangeValue::at_least("volume", 100_000.0).expect("range")),
                )
            })
            .expect("spec");

        assert_eq!(compile_filter(&spec), "etf_aum_1000to,sh_curvol_100to");
    }

    #[test]
    fn date_spans_use_month_day_year() {
        let spec = FilterSpec::new()
            .with_filter(
                FilterKey::EarningsDate,
                FilterValue::DateRange {
                    start: Date::from_calendar_date(2025, Month::June, 30).expect("date"),
                    end: Date::from_calendar_date(2025, Month::July, 4).expect("date"),
                },
            )
            .expect("spec");

        assert_eq!(compile_filter(&spec), "earningsdate_06-30-2025x07-04-2025");
    }

    #[test]
    fn emitted_filters_parse_back_to_the_same_spec() {
        for intent in ScreenerIntent::ALL {
            let spec = build(intent, &Overrides::default()).expect("spec");
            let params = compile(&spec, None);

            let reparsed =
                FilterSpec::from_filter_param(params.get("f").unwrap_or(""), params.get("o"))
                    .expect("reparse");

            assert_eq!(
                reparsed.filters().collect::<Vec<_>>(),
                spec.filters().collect::<Vec<_>>(),
                "{intent}"
            );
            assert_eq!(reparsed.sort(), spec.sort(), "{intent}");
        }
    }

    #[test]
    fn shared_sma50_field_splits_by_value() {
        let groups = parse_filter_param("ta_sma50_pa,ta_sma50_sa200,ta_perf2_4wup").expect("parse");

        assert_eq!(groups[0].field, "ta_sma50");
        assert_eq!(groups[2].field, "ta_perf2");

        let spec = FilterSpec::from_filter_param("ta_sma50_pa,ta_sma50_sa200", None).expect("spec");
        assert_eq!(spec.get(FilterKey::Sma50), Some(&FilterValue::Token(String::from("pa"))));
        assert_eq!(spec.get(FilterKey::Sma50AboveSma200), Some(&FilterValue::Flag));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_filter_param("zz_top").is_err());
        assert!(FilterSpec::from_filter_param("sh_price_cheap", None).is_err());
    }

    #[test]
    fn fundamentals_request_lists_tickers_and_columns() {
        let tickers = vec![
            Ticker::parse("AAPL").expect("ticker"),
            Ticker::parse("msft").expect("ticker"),
        ];

        let params = compile_fundamentals(&tickers, Some("key"));

        assert_eq!(params.get("v"), Some("152"));
        assert_eq!(params.get("t"), Some("AAPL,MSFT"));
        assert_eq!(params.get("c"), Some(FUNDAMENTALS_COLUMNS));
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            vec!["v", "ft", "c", "t", "auth"]
        );
    }
}
