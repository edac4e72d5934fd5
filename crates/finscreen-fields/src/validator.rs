use std::collections::{BTreeMap, HashSet};

use crate::metadata::ValidationResult;
use crate::registry::FieldVocabulary;
use crate::similarity::closest_matches;

/// Known historical typos and renames, checked before fuzzy matching.
const KNOWN_CORRECTIONS: &[(&str, &str)] = &[
    ("eps_yoy", "eps_growth_this_y"),
    ("sales_qtr_over_qtr", "sales_growth_qtr"),
    ("sales_growth_yoy", "sales_growth_this_y"),
    ("div_yield", "dividend_yield"),
    ("market_capitalication", "market_cap"),
    ("pe", "pe_ratio"),
    ("pb", "pb_ratio"),
    ("ps", "ps_ratio"),
    ("eps_growth_qtr_over_qtr", "eps_growth_qtr"),
    ("divident_yield", "dividend_yield"),
    ("pe_ration", "pe_ratio"),
];

/// Validates candidate field names against a vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator<'v> {
    vocabulary: &'v FieldVocabulary,
}

impl Default for FieldValidator<'static> {
    fn default() -> Self {
        Self::new(FieldVocabulary::builtin())
    }
}

impl<'v> FieldValidator<'v> {
    pub fn new(vocabulary: &'v FieldVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Partition `names` into valid and invalid, with suggestions for the
    /// invalid ones. Duplicates are dropped keeping first occurrence.
    pub fn validate<S: AsRef<str>>(&self, names: &[S]) -> ValidationResult {
        let mut seen = HashSet::new();
        let mut result = ValidationResult::default();

        for name in names.iter().map(AsRef::as_ref) {
            if !seen.insert(name) {
                continue;
            }
            if self.vocabulary.contains(name) {
                result.valid_fields.push(String::from(name));
            } else {
                result.invalid_fields.push(String::from(name));
                result
                    .suggestions
                    .insert(String::from(name), self.suggest(name));
            }
        }

        result.all_valid = result.invalid_fields.is_empty();
        result
    }

    /// Suggestions for each of `names`, keyed by name.
    pub fn suggest_corrections<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, Vec<String>> {
        names
            .iter()
            .map(|name| (String::from(name.as_ref()), self.suggest(name.as_ref())))
            .collect()
    }

    fn suggest(&self, name: &str) -> Vec<String> {
        if let Some((_, correction)) = KNOWN_CORRECTIONS.iter().find(|(typo, _)| *typo == name) {
            return vec![String::from(*correction)];
        }

        closest_matches(name, self.vocabulary.names())
            .into_iter()
            .map(String::from)
            .collect()
    }
}
