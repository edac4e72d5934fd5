use crate::error::{ParseIssue, ResponseIssue};

use super::{looks_like_html, normalize, NormalizeReport, RawRow, ResponseShape};

/// Normalize a CSV export body.
///
/// Short and long rows are tolerated; cells beyond the header are ignored and
/// missing trailing cells read as absent.
pub fn normalize_csv(body: &str) -> NormalizeReport {
    let body = body.trim_start_matches('\u{feff}');
    if body.trim().is_empty() {
        return NormalizeReport::unusable(ResponseIssue::EmptyBody);
    }
    if looks_like_html(body) {
        return NormalizeReport::unusable(ResponseIssue::UnexpectedHtml);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => {
            return NormalizeReport::unusable(ResponseIssue::MalformedHeader {
                message: error.to_string(),
            })
        }
    };

    let mut report = NormalizeReport::default();
    for (index, record) in reader.records().enumerate() {
        let result = match record {
            Ok(record) => {
                let row = RawRow::from_pairs(headers.iter().zip(record.iter()));
                normalize(&row, ResponseShape::Csv)
            }
            Err(error) => Err(ParseIssue::Malformed {
                message: error.to_string(),
            }),
        };
        report.push(index, result);
    }

    tracing::debug!(
        records = report.records.len(),
        dropped = report.issues.len(),
        "csv body normalized"
    );
    report
}
