//! Raw response rows to typed [`StockRecord`]s.
//!
//! The export endpoint answers with CSV; the web results page with an HTML
//! table. Both spell some columns differently, so each [`ResponseShape`] has
//! its own header table derived from the field vocabulary. Rows that cannot
//! become a record are reported, never fatal.

mod delimited;
mod headers;
mod table;

use finscreen_fields::DataType;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{StockRecord, Ticker};
use crate::error::{ParseIssue, ResponseIssue};
use crate::units::{is_missing, parse_numeric, Number};

pub use delimited::normalize_csv;
pub(crate) use headers::HeaderTable;
pub use table::normalize_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    Csv,
    Html,
}

/// Header/cell pairs of one response row, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, H, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (H, C)>,
        H: Into<String>,
        C: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(header, cell)| (header.into().trim().to_owned(), cell.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, cell: impl Into<String>) {
        self.cells.push((header.into().trim().to_owned(), cell.into()));
    }

    /// The cell under `header`, if the row has that column.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, cell)| cell.as_str())
    }

    /// Whether every cell is empty or a missing marker.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| is_missing(cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A dropped row and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// Zero-based index among data rows.
    pub row: usize,
    pub issue: ParseIssue,
}

/// Result of normalizing a whole response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub records: Vec<StockRecord>,
    pub issues: Vec<RowIssue>,
    /// Set when the body as a whole was unusable; `records` is then empty.
    pub response_issue: Option<ResponseIssue>,
}

impl NormalizeReport {
    pub(crate) fn unusable(issue: ResponseIssue) -> Self {
        tracing::warn!(issue = %issue, "response body unusable");
        Self {
            response_issue: Some(issue),
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, row: usize, result: Result<StockRecord, ParseIssue>) {
        match result {
            Ok(record) => self.records.push(record),
            Err(issue) => {
                tracing::warn!(row, reason = %issue, "response row dropped");
                self.issues.push(RowIssue { row, issue });
            }
        }
    }
}

/// Convert one raw row into a record.
pub fn normalize(row: &RawRow, shape: ResponseShape) -> Result<StockRecord, ParseIssue> {
    if row.is_blank() {
        return Err(ParseIssue::EmptyRow);
    }

    let table = HeaderTable::for_shape(shape);
    let ticker_cell = table
        .column("ticker")
        .and_then(|column| first_present(row, &column.headers))
        .ok_or(ParseIssue::MissingTicker)?;
    let ticker = Ticker::parse(ticker_cell).map_err(|error| ParseIssue::InvalidTicker {
        value: ticker_cell.trim().to_owned(),
        reason: error.to_string(),
    })?;

    let mut values = Map::new();
    values.insert(String::from("ticker"), Value::String(ticker.as_str().to_owned()));
    for column in table.columns() {
        if column.field == "ticker" {
            continue;
        }
        if let Some(value) = first_present(row, &column.headers)
            .and_then(|cell| typed_value(column.data_type, cell))
        {
            values.insert(column.field.to_owned(), value);
        }
    }

    serde_json::from_value(Value::Object(values)).map_err(|error| ParseIssue::Malformed {
        message: error.to_string(),
    })
}

fn first_present<'r>(row: &'r RawRow, headers: &[&str]) -> Option<&'r str> {
    headers
        .iter()
        .filter_map(|header| row.get(header))
        .find(|cell| !is_missing(cell))
}

fn typed_value(data_type: DataType, cell: &str) -> Option<Value> {
    let cell = cell.trim();
    match data_type {
        DataType::Text | DataType::Date => Some(Value::String(cell.to_owned())),
        DataType::Boolean => parse_bool(cell).map(Value::Bool),
        DataType::Integer => parse_numeric(cell).and_then(whole_count).map(Value::from),
        DataType::Number | DataType::Percentage | DataType::Currency => parse_numeric(cell)
            .map(Number::as_f64)
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
    }
}

/// Counts are non-negative; fractional counts are rounded.
fn whole_count(number: Number) -> Option<u64> {
    number.as_u64().or_else(|| match number {
        Number::Float(value) if value.is_finite() && value >= 0.0 => Some(value.round() as u64),
        _ => None,
    })
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "yes" | "true" | "y" => Some(true),
        "no" | "false" | "n" => Some(false),
        _ => None,
    }
}

/// Whether a body that should be CSV is actually an HTML document.
pub(crate) fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(512).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.contains("<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn html_row_normalizes_units_and_missing_markers() {
        let raw = row(&[
            ("Ticker", "AAPL"),
            ("Price", "$180.50"),
            ("Market Cap", "2.8B"),
            ("Dividend %", "-"),
        ]);

        let record = normalize(&raw, ResponseShape::Html).expect("record");

        assert_eq!(record.ticker.as_str(), "AAPL");
        assert_eq!(record.price, Some(180.50));
        assert_eq!(record.market_cap, Some(2_800_000_000.0));
        assert_eq!(record.dividend_yield, None);
    }

    #[test]
    fn csv_and_html_read_dividend_differently() {
        let raw = row(&[("Ticker", "KO"), ("Dividend", "1.94")]);

        let csv = normalize(&raw, ResponseShape::Csv).expect("record");
        let html = normalize(&raw, ResponseShape::Html).expect("record");

        assert_eq!(csv.dividend, Some(1.94));
        assert_eq!(csv.dividend_yield, None);
        assert_eq!(html.dividend_yield, Some(1.94));
        assert_eq!(html.dividend, None);
    }

    #[test]
    fn earnings_date_falls_back_through_headers() {
        let raw = row(&[
            ("Ticker", "NVDA"),
            ("Earnings Date", "-"),
            ("Earnings", ""),
            ("Next Earnings Date", "08/27/2025"),
        ]);

        let record = normalize(&raw, ResponseShape::Csv).expect("record");

        assert_eq!(record.earnings_date.as_deref(), Some("08/27/2025"));
    }

    #[test]
    fn integers_booleans_and_text_are_typed() {
        let raw = row(&[
            ("Ticker", "msft"),
            ("Company", "Microsoft Corporation"),
            ("Volume", "21,345,678"),
            ("Employees", "N/A"),
            ("Optionable", "Yes"),
            ("Shortable", "no"),
            ("Sector", "-"),
        ]);

        let record = normalize(&raw, ResponseShape::Csv).expect("record");

        assert_eq!(record.ticker.as_str(), "MSFT");
        assert_eq!(record.company.as_deref(), Some("Microsoft Corporation"));
        assert_eq!(record.volume, Some(21_345_678));
        assert_eq!(record.employees, None);
        assert_eq!(record.optionable, Some(true));
        assert_eq!(record.shortable, Some(false));
        assert_eq!(record.sector, None);
    }

    #[test]
    fn fractional_counts_round_and_negative_counts_drop() {
        assert_eq!(whole_count(Number::Float(1_234.6)), Some(1_235));
        assert_eq!(whole_count(Number::Integer(-5)), None);
        assert_eq!(whole_count(Number::Float(-5.5)), None);
    }

    #[test]
    fn row_level_issues_are_distinguished() {
        let blank = row(&[("Ticker", ""), ("Price", "-")]);
        let no_ticker = row(&[("Ticker", "-"), ("Price", "12.00")]);
        let bad_ticker = row(&[("Ticker", "1ABC"), ("Price", "12.00")]);

        assert_eq!(normalize(&blank, ResponseShape::Csv), Err(ParseIssue::EmptyRow));
        assert_eq!(normalize(&no_ticker, ResponseShape::Csv), Err(ParseIssue::MissingTicker));
        assert!(matches!(
            normalize(&bad_ticker, ResponseShape::Csv),
            Err(ParseIssue::InvalidTicker { value, .. }) if value == "1ABC"
        ));
    }

    #[test]
    fn ticker_only_rows_are_kept() {
        let record = normalize(&row(&[("Ticker", "SPY")]), ResponseShape::Csv).expect("record");

        assert_eq!(record, StockRecord::new(Ticker::parse("SPY").expect("ticker")));
    }

    #[test]
    fn html_detection_ignores_leading_whitespace_and_case() {
        assert!(looks_like_html("\n  <!DOCTYPE html><html></html>"));
        assert!(looks_like_html("<HTML><body>login</body></HTML>"));
        assert!(!looks_like_html("No.,Ticker\n1,AAPL"));
    }
}
