//! # Finscreen Fields
//!
//! Canonical field vocabulary for screener data, with validation, typo
//! correction and keyword search.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`metadata`] | Field metadata, categories and validation results |
//! | [`registry`] | The read-only [`FieldVocabulary`] |
//! | [`validator`] | Exact validation with correction suggestions |
//! | [`search`] | Ranked keyword search |
//! | [`similarity`] | Normalized edit-distance helpers |
//!
//! ## Quick Start
//!
//! ```rust
//! use finscreen_fields::{FieldSearchEngine, FieldValidator};
//!
//! let result = FieldValidator::default().validate(&["ticker", "eps_yoy"]);
//! assert_eq!(result.valid_fields, vec!["ticker"]);
//! assert_eq!(result.suggestions_for("eps_yoy"), ["eps_growth_this_y"]);
//!
//! let hits = FieldSearchEngine::default().search("dividend", None);
//! assert_eq!(hits[0].name, "dividend");
//! ```
//!
//! Invalid names are never an error: they come back as data inside
//! [`ValidationResult`] so callers can offer "did you mean" guidance.

mod catalog;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod search;
pub mod similarity;
pub mod validator;

pub use error::{UnknownField, VocabularyError};
pub use metadata::{DataType, FieldCategory, FieldMetadata, ValidationResult};
pub use registry::FieldVocabulary;
pub use search::{FieldSearchEngine, MatchTier, SearchHit};
pub use similarity::similarity;
pub use validator::FieldValidator;
