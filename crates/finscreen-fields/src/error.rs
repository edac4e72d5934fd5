use thiserror::Error;

/// Errors raised while loading a vocabulary file.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed vocabulary file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field '{name}' is declared more than once")]
    DuplicateField { name: String },

    #[error("field '{field}' references unknown category '{category}'")]
    UnknownCategory { field: String, category: String },

    #[error("field name cannot be empty")]
    EmptyFieldName,
}

/// Lookup of a name that is not part of the vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("field '{name}' not found")]
pub struct UnknownField {
    pub name: String,
    /// Vocabulary names that contain, or are contained in, the requested name.
    pub similar: Vec<String>,
}
