use crate::metadata::FieldMetadata;
use crate::registry::FieldVocabulary;

const NAME_SCORE: u32 = 100;
const EXACT_NAME_BONUS: u32 = 100;
const PREFIX_BONUS: u32 = 50;
const DISPLAY_SCORE: u32 = 50;
const DESCRIPTION_SCORE: u32 = 10;

/// Where a keyword matched; the first matching tier wins per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Name,
    DisplayName,
    Description,
}

/// One ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'v> {
    pub field: &'v FieldMetadata,
    pub tier: MatchTier,
    pub score: u32,
}

/// Keyword search over a vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct FieldSearchEngine<'v> {
    vocabulary: &'v FieldVocabulary,
}

impl Default for FieldSearchEngine<'static> {
    fn default() -> Self {
        Self::new(FieldVocabulary::builtin())
    }
}

impl<'v> FieldSearchEngine<'v> {
    pub fn new(vocabulary: &'v FieldVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Fields matching `keyword`, most relevant first.
    pub fn search(&self, keyword: &str, category: Option<&str>) -> Vec<&'v FieldMetadata> {
        self.ranked(keyword, category)
            .into_iter()
            .map(|hit| hit.field)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps the tier and score of each hit.
    pub fn ranked(&self, keyword: &str, category: Option<&str>) -> Vec<SearchHit<'v>> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'v>> = self
            .vocabulary
            .iter()
            .filter(|field| category.map_or(true, |wanted| field.category.eq_ignore_ascii_case(wanted)))
            .filter_map(|field| {
                let tier = match_tier(&keyword, field)?;
                Some(SearchHit {
                    field,
                    tier,
                    score: relevance(&keyword, field, tier),
                })
            })
            .collect();

        // stable: ties keep vocabulary order
        hits.sort_by(|left, right| right.score.cmp(&left.score));
        hits
    }
}

fn match_tier(keyword: &str, field: &FieldMetadata) -> Option<MatchTier> {
    if field.name.to_lowercase().contains(keyword) {
        Some(MatchTier::Name)
    } else if field.display_name.to_lowercase().contains(keyword) {
        Some(MatchTier::DisplayName)
    } else if field.description.to_lowercase().contains(keyword) {
        Some(MatchTier::Description)
    } else {
        None
    }
}

fn relevance(keyword: &str, field: &FieldMetadata, tier: MatchTier) -> u32 {
    match tier {
        MatchTier::Name => {
            let name = field.name.to_lowercase();
            let mut score = NAME_SCORE;
            if name == keyword {
                score += EXACT_NAME_BONUS;
            }
            if name.starts_with(keyword) {
                score += PREFIX_BONUS;
            }
            score
        }
        MatchTier::DisplayName => DISPLAY_SCORE,
        MatchTier::Description => DESCRIPTION_SCORE,
    }
}
