use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Value shape of a field as it appears in screener responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Text,
    Integer,
    Number,
    Percentage,
    Currency,
    Date,
    Boolean,
}

impl DataType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Percentage => "percentage",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }

    /// Whether cells of this type go through numeric unit parsing.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Number | Self::Percentage | Self::Currency
        )
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata for one canonical field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    pub display_name: String,
    pub category: String,
    pub description: String,
    pub data_type: DataType,
    #[serde(default)]
    pub format_hint: String,
    #[serde(default)]
    pub special_values: Vec<String>,
    #[serde(default)]
    pub related_fields: Vec<String>,
    #[serde(default)]
    pub usage_examples: Vec<String>,
    /// Column headers used by the CSV export, in lookup priority order.
    #[serde(default)]
    pub csv_headers: Vec<String>,
    /// Column headers used by the HTML results table, in lookup priority order.
    #[serde(default)]
    pub html_headers: Vec<String>,
}

/// A named group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub field_count: usize,
}

impl FieldCategory {
    pub fn display_name(&self) -> String {
        format!("{} ({} fields)", self.name, self.field_count)
    }
}

/// Outcome of validating a list of candidate field names.
///
/// Invalid names are reported as data, never as an error, so callers can render
/// "did you mean" guidance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub all_valid: bool,
    pub valid_fields: Vec<String>,
    pub invalid_fields: Vec<String>,
    pub suggestions: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    /// Suggestions recorded for one invalid name; empty when none were found.
    pub fn suggestions_for(&self, name: &str) -> &[String] {
        self.suggestions
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// One-line summary, listing at most three names per side.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} valid, {} invalid fields",
            self.valid_fields.len(),
            self.invalid_fields.len()
        );
        if !self.valid_fields.is_empty() {
            summary.push_str(" - Valid: ");
            summary.push_str(&abbreviate(&self.valid_fields));
        }
        if !self.invalid_fields.is_empty() {
            summary.push_str(" - Invalid: ");
            summary.push_str(&abbreviate(&self.invalid_fields));
        }
        summary
    }
}

fn abbreviate(names: &[String]) -> String {
    const SHOWN: usize = 3;
    let mut text = names
        .iter()
        .take(SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > SHOWN {
        text.push_str(&format!(" and {} more", names.len() - SHOWN));
    }
    text
}
