//! Behavior-driven tests for field discovery
//!
//! These tests cover how a user finds, checks and corrects field names before
//! asking for data, and that the vocabulary matches what records carry.

use std::collections::BTreeSet;

use finscreen_core::{StockRecord, Ticker};
use finscreen_fields::{DataType, FieldSearchEngine, FieldValidator, FieldVocabulary, MatchTier};

// =============================================================================
// Field Discovery: Validation and Correction
// =============================================================================

#[tokio::test]
async fn when_user_mistypes_a_field_then_a_correction_is_suggested() {
    // Given: A request mixing good names with common typos
    let validator = FieldValidator::default();

    // When: The names are validated
    let result = validator.validate(&["ticker", "price", "eps_yoy", "divident_yield"]);

    // Then: The good names pass and each typo gets its canonical correction
    assert!(!result.all_valid);
    assert_eq!(result.valid_fields, vec!["ticker", "price"]);
    assert_eq!(result.invalid_fields, vec!["eps_yoy", "divident_yield"]);
    assert_eq!(result.suggestions_for("eps_yoy"), ["eps_growth_this_y"]);
    assert_eq!(result.suggestions_for("divident_yield"), ["dividend_yield"]);
}

#[tokio::test]
async fn when_user_sends_nonsense_then_it_is_reported_not_raised() {
    // Given: A name that resembles nothing
    let validator = FieldValidator::default();

    // When: It is validated alongside a real field
    let result = validator.validate(&["ticker", "bogus_field_zzz"]);

    // Then: The outcome is data, with the bad name isolated
    assert_eq!(result.valid_fields, vec!["ticker"]);
    assert_eq!(result.invalid_fields, vec!["bogus_field_zzz"]);
    assert!(result.summary().contains("bogus_field_zzz"));
}

#[tokio::test]
async fn when_nothing_is_requested_then_validation_passes() {
    let result = FieldValidator::default().validate::<&str>(&[]);

    assert!(result.all_valid);
    assert!(result.valid_fields.is_empty());
    assert!(result.suggestions.is_empty());
}

#[tokio::test]
async fn when_a_legacy_alias_is_used_then_it_resolves_to_the_canonical_field() {
    // Given: The built-in vocabulary
    let vocabulary = FieldVocabulary::builtin();

    // When: Legacy names are resolved
    // Then: They map onto canonical fields, and unknown names do not
    assert_eq!(vocabulary.resolve_alias("debt_to_equity"), Some("debt_equity"));
    assert_eq!(vocabulary.resolve_alias("roi"), Some("roic"));
    assert_eq!(vocabulary.resolve_alias("price"), Some("price"));
    assert_eq!(vocabulary.resolve_alias("moonshot"), None);

    let described = vocabulary.describe("company_name").expect("alias describes");
    assert_eq!(described.name, "company");
}

// =============================================================================
// Field Discovery: Search
// =============================================================================

#[tokio::test]
async fn when_user_searches_a_keyword_then_every_hit_mentions_it() {
    // Given: The default search engine
    let engine = FieldSearchEngine::default();

    // When: The user searches for "growth"
    let hits = engine.search("growth", None);

    // Then: Every hit contains the keyword somewhere a user can see
    assert!(!hits.is_empty());
    for field in hits {
        let text = format!(
            "{} {} {}",
            field.name, field.display_name, field.description
        )
        .to_lowercase();
        assert!(text.contains("growth"), "{} does not mention growth", field.name);
    }
}

#[tokio::test]
async fn when_a_keyword_is_an_exact_name_then_that_field_ranks_first() {
    let engine = FieldSearchEngine::default();

    let ranked = engine.ranked("volume", None);

    assert_eq!(ranked[0].field.name, "volume");
    assert_eq!(ranked[0].tier, MatchTier::Name);
    assert!(ranked
        .iter()
        .skip(1)
        .all(|hit| hit.score <= ranked[0].score));
}

#[tokio::test]
async fn when_search_is_scoped_to_a_category_then_other_categories_are_excluded() {
    let engine = FieldSearchEngine::default();

    let hits = engine.search("performance", Some("Performance"));

    assert!(!hits.is_empty());
    assert!(hits.iter().all(|field| field.category == "performance"));
}

// =============================================================================
// Field Discovery: Vocabulary and Records Agree
// =============================================================================

#[tokio::test]
async fn when_a_record_is_serialized_then_its_keys_are_the_vocabulary() {
    // Given: An otherwise empty record
    let record = StockRecord::new(Ticker::parse("IBM").expect("ticker"));

    // When: It is serialized
    let json = serde_json::to_value(&record).expect("serialize");
    let keys: BTreeSet<&str> = json
        .as_object()
        .expect("record is an object")
        .keys()
        .map(String::as_str)
        .collect();

    // Then: Its keys are exactly the vocabulary names, and absent values are null
    let names: BTreeSet<&str> = FieldVocabulary::builtin().names().collect();
    assert_eq!(keys, names);
    assert!(json["price"].is_null());
    assert_eq!(json["ticker"], "IBM");
}

#[tokio::test]
async fn when_categories_are_listed_then_counts_cover_every_field() {
    let vocabulary = FieldVocabulary::builtin();

    let categories = vocabulary.categories();

    let total: usize = categories.iter().map(|category| category.field_count).sum();
    assert_eq!(total, vocabulary.len());
    assert!(categories.iter().any(|category| category.id == "earnings"));
}

#[tokio::test]
async fn when_a_field_is_described_then_its_type_and_headers_are_known() {
    let market_cap = FieldVocabulary::builtin()
        .describe("market_cap")
        .expect("market_cap exists");

    assert_eq!(market_cap.data_type, DataType::Currency);
    assert!(market_cap.csv_headers.iter().any(|header| header == "Market Cap"));
    assert!(!market_cap.format_hint.is_empty());
}
