use std::sync::OnceLock;

use finscreen_fields::{DataType, FieldVocabulary};

use super::ResponseShape;

static CSV_TABLE: OnceLock<HeaderTable> = OnceLock::new();
static HTML_TABLE: OnceLock<HeaderTable> = OnceLock::new();

/// One record field and the headers it may appear under.
#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub field: &'static str,
    pub data_type: DataType,
    /// Lookup priority order; the first non-missing cell wins.
    pub headers: Vec<&'static str>,
}

/// Header-to-field mapping for one response shape, derived from the builtin
/// vocabulary.
#[derive(Debug)]
pub(crate) struct HeaderTable {
    columns: Vec<Column>,
}

impl HeaderTable {
    pub fn for_shape(shape: ResponseShape) -> &'static Self {
        match shape {
            ResponseShape::Csv => CSV_TABLE.get_or_init(|| Self::build(shape)),
            ResponseShape::Html => HTML_TABLE.get_or_init(|| Self::build(shape)),
        }
    }

    fn build(shape: ResponseShape) -> Self {
        let columns = FieldVocabulary::builtin()
            .iter()
            .map(|field| Column {
                field: field.name.as_str(),
                data_type: field.data_type,
                headers: match shape {
                    ResponseShape::Csv => &field.csv_headers,
                    ResponseShape::Html => &field.html_headers,
                }
                .iter()
                .map(String::as_str)
                .collect(),
            })
            .filter(|column| !column.headers.is_empty())
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.field == field)
    }

    /// Field a header maps to, if any.
    #[cfg(test)]
    pub fn field_for(&self, header: &str) -> Option<&'static str> {
        let header = header.trim();
        self.columns
            .iter()
            .find(|column| column.headers.iter().any(|known| *known == header))
            .map(|column| column.field)
    }
}
