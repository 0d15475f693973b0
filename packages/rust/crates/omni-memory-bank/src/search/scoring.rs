use std::collections::BTreeSet;

/// Tokens of this many characters or fewer are dropped as stop-words.
const MIN_TERM_CHARS: usize = 3;
/// Weight of the term match ratio.
const TERM_RATIO_WEIGHT: f64 = 0.8;
/// Flat co-occurrence bonus once two or more distinct terms match.
const CO_OCCURRENCE_BONUS: f64 = 0.2;

/// Lower-cased whitespace tokens of `query` with short tokens dropped.
///
/// Repeated words are kept: they weigh on the match ratio denominator.
#[must_use]
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .map(ToString::to_string)
        .collect()
}

/// Relevance of `text` for `query`, in `[0, 1]`.
///
/// A case-insensitive verbatim occurrence of the whole query scores `1.0`.
/// Otherwise the score is `ratio * 0.8 + bonus`, where `ratio` is the share
/// of `terms` found as substrings (each distinct term counted once, over
/// the full term list) and `bonus` is a flat `0.2` once at least
/// two distinct terms match. The bonus ignores term distance.
#[must_use]
pub fn score(query: &str, terms: &[String], text: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let text_lower = text.to_lowercase();
    if text_lower.contains(&query.to_lowercase()) {
        return 1.0;
    }
    if terms.is_empty() {
        return 0.0;
    }

    let matched = terms
        .iter()
        .map(String::as_str)
        .filter(|term| !term.is_empty() && text_lower.contains(term))
        .collect::<BTreeSet<&str>>()
        .len();
    let ratio = matched as f64 / terms.len() as f64;
    let bonus = if matched >= 2 { CO_OCCURRENCE_BONUS } else { 0.0 };
    ratio * TERM_RATIO_WEIGHT + bonus
}
