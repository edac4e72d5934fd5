use scraper::{ElementRef, Html, Selector};

use crate::error::ResponseIssue;

use super::{normalize, NormalizeReport, RawRow, ResponseShape};

struct Selectors {
    screener: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
    header_cell: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            screener: Selector::parse("table.screener_table").ok()?,
            table: Selector::parse("table").ok()?,
            row: Selector::parse("tr").ok()?,
            cell: Selector::parse("th, td").ok()?,
            header_cell: Selector::parse("th").ok()?,
        })
    }
}

/// Normalize an HTML results page.
///
/// The results table is located by trying, in order, tables with the
/// `screener_table` class, tables with `<th>` header cells, then any table.
/// The first candidate with a header row and at least one data row wins.
pub fn normalize_html(body: &str) -> NormalizeReport {
    if body.trim().is_empty() {
        return NormalizeReport::unusable(ResponseIssue::EmptyBody);
    }
    let Some(selectors) = Selectors::new() else {
        return NormalizeReport::unusable(ResponseIssue::NoTable);
    };

    let document = Html::parse_document(body);
    let tables: Vec<ElementRef<'_>> = document.select(&selectors.table).collect();
    if tables.is_empty() {
        return NormalizeReport::unusable(ResponseIssue::NoTable);
    }

    let candidates = document
        .select(&selectors.screener)
        .chain(
            tables
                .iter()
                .copied()
                .filter(|table| table.select(&selectors.header_cell).next().is_some()),
        )
        .chain(tables.iter().copied());

    let Some(rows) = candidates
        .map(|table| table_rows(table, &selectors))
        .find(|rows| rows.len() > 1)
    else {
        tracing::debug!(tables = tables.len(), "no html table with data rows");
        return NormalizeReport::default();
    };

    let (header, data) = rows.split_at(1);
    let mut report = NormalizeReport::default();
    for (index, cells) in data.iter().enumerate() {
        let row = RawRow::from_pairs(header[0].iter().zip(cells.iter()));
        report.push(index, normalize(&row, ResponseShape::Html));
    }

    tracing::debug!(
        records = report.records.len(),
        dropped = report.issues.len(),
        "html body normalized"
    );
    report
}

fn table_rows(table: ElementRef<'_>, selectors: &Selectors) -> Vec<Vec<String>> {
    table
        .select(&selectors.row)
        .map(|row| {
            row.select(&selectors.cell)
                .map(|cell| cell.text().collect::<String>().trim().to_owned())
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}
