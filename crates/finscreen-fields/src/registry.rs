use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::catalog::{FieldSeed, ALIASES, CATEGORIES, FIELDS};
use crate::error::{UnknownField, VocabularyError};
use crate::metadata::{DataType, FieldCategory, FieldMetadata};

static BUILTIN: OnceLock<FieldVocabulary> = OnceLock::new();

/// Read-only registry of canonical field names and their metadata.
///
/// Iteration follows declaration order. The built-in instance is created on
/// first use and shared for the rest of the process.
#[derive(Debug, Clone)]
pub struct FieldVocabulary {
    fields: Vec<FieldMetadata>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl FieldVocabulary {
    /// The vocabulary compiled into the crate.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| {
            let fields = FIELDS.iter().map(seed_to_metadata).collect();
            let vocabulary = Self::from_fields(fields)
                .unwrap_or_else(|error| panic!("built-in field table is inconsistent: {error}"));
            tracing::debug!(fields = vocabulary.len(), "loaded built-in field vocabulary");
            vocabulary
        })
    }

    /// Build a vocabulary from explicit metadata, rejecting duplicates and
    /// unknown categories.
    pub fn from_fields(fields: Vec<FieldMetadata>) -> Result<Self, VocabularyError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(VocabularyError::EmptyFieldName);
            }
            if !CATEGORIES.iter().any(|seed| seed.id == field.category) {
                return Err(VocabularyError::UnknownCategory {
                    field: field.name.clone(),
                    category: field.category.clone(),
                });
            }
            if index.insert(field.name.clone(), position).is_some() {
                return Err(VocabularyError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }

        let aliases = ALIASES
            .iter()
            .filter(|(_, target)| index.contains_key(*target))
            .map(|(alias, target)| (String::from(*alias), String::from(*target)))
            .collect();

        Ok(Self {
            fields,
            index,
            aliases,
        })
    }

    /// Parse a JSON array of field metadata.
    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let fields: Vec<FieldMetadata> = serde_json::from_str(json)?;
        Self::from_fields(fields)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldMetadata> {
        self.index.get(name).map(|position| &self.fields[*position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Map a legacy alias onto its canonical name. Canonical names resolve to
    /// themselves; unknown names resolve to `None`.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.contains(name) {
            return Some(name);
        }
        self.aliases.get(name).map(String::as_str)
    }

    /// All categories with their field counts, in a fixed order.
    pub fn categories(&self) -> Vec<FieldCategory> {
        CATEGORIES
            .iter()
            .map(|seed| FieldCategory {
                id: String::from(seed.id),
                name: String::from(seed.name),
                description: String::from(seed.description),
                field_count: self
                    .fields
                    .iter()
                    .filter(|field| field.category == seed.id)
                    .count(),
            })
            .collect()
    }

    /// Fields of one category, compared case-insensitively.
    pub fn fields_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a FieldMetadata> + 'a {
        self.fields
            .iter()
            .filter(move |field| field.category.eq_ignore_ascii_case(category))
    }

    /// Full metadata for one field, or the names that look related to it.
    pub fn describe(&self, name: &str) -> Result<&FieldMetadata, UnknownField> {
        if let Some(field) = self.resolve_alias(name).and_then(|name| self.get(name)) {
            return Ok(field);
        }

        let needle = name.to_ascii_lowercase();
        let similar = self
            .names()
            .filter(|candidate| {
                let candidate = candidate.to_ascii_lowercase();
                !needle.is_empty() && (candidate.contains(&needle) || needle.contains(&candidate))
            })
            .take(5)
            .map(String::from)
            .collect();

        Err(UnknownField {
            name: String::from(name),
            similar,
        })
    }
}

fn seed_to_metadata(seed: &FieldSeed) -> FieldMetadata {
    let format_hint = if seed.format.is_empty() {
        default_format_hint(seed.data_type)
    } else {
        seed.format
    };
    let special_values: &[&str] = match seed.data_type {
        DataType::Text | DataType::Date => &["-"],
        DataType::Boolean => &[],
        _ => &["-", "N/A"],
    };

    FieldMetadata {
        name: String::from(seed.name),
        display_name: String::from(seed.display),
        category: String::from(seed.category),
        description: String::from(seed.description),
        data_type: seed.data_type,
        format_hint: String::from(format_hint),
        special_values: to_strings(special_values),
        related_fields: to_strings(seed.related),
        usage_examples: to_strings(seed.examples),
        csv_headers: to_strings(seed.csv),
        html_headers: to_strings(seed.html),
    }
}

fn default_format_hint(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Text => "Free text",
        DataType::Integer => "Whole number, may carry a K/M/B suffix",
        DataType::Number => "Decimal number",
        DataType::Percentage => "Percentage (e.g. 12.5%)",
        DataType::Currency => "Dollar amount, may carry a K/M/B suffix",
        DataType::Date => "Date as reported by the service",
        DataType::Boolean => "Yes or No",
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| String::from(*value)).collect()
}
