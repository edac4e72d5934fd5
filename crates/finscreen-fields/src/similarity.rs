//! Pure string-similarity helpers used for typo correction.

/// Minimum ratio for a vocabulary name to count as a suggestion.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Maximum number of fuzzy suggestions returned per name.
pub const MAX_SUGGESTIONS: usize = 3;

/// Normalized Levenshtein ratio in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Up to [`MAX_SUGGESTIONS`] candidates whose ratio reaches the cutoff, best
/// first. Equal ratios keep candidate order.
pub fn closest_matches<'a, I>(name: &str, candidates: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &'a str)> = candidates
        .into_iter()
        .map(|candidate| (similarity(name, candidate), candidate))
        .filter(|(ratio, _)| *ratio >= SUGGESTION_CUTOFF)
        .collect();

    scored.sort_by(|left, right| right.0.total_cmp(&left.0));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate)
        .collect()
}
