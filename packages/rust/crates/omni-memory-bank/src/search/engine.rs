use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::scoring::{query_terms, score};
use super::sections::split_sections;
use super::snippet::extract_snippet;
use crate::DocumentCorpus;
use crate::error::{MemoryBankError, Result};

/// Paragraphs must score strictly above this to produce a hit.
pub const SCORE_THRESHOLD: f64 = 0.3;
/// Maximum number of hits returned by [`search`].
pub const MAX_RESULTS: usize = 5;

/// One ranked paragraph match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Corpus key of the matching document.
    pub document_name: String,
    /// Relevance in `(0, 1]`; `1.0` means the full query occurs verbatim.
    pub relevance_score: f64,
    /// Word-safe excerpt, prefixed by the section title when present.
    pub snippet: String,
}

/// Reject blank queries and queries shorter than `min_chars`.
///
/// The engine itself accepts any query; callers run this first so users get
/// a message instead of an empty result.
///
/// # Errors
///
/// Returns [`MemoryBankError::EmptyQuery`] or [`MemoryBankError::QueryTooShort`].
pub fn validate_query(query: &str, min_chars: usize) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(MemoryBankError::EmptyQuery);
    }
    let actual = trimmed.chars().count();
    if actual < min_chars {
        return Err(MemoryBankError::QueryTooShort {
            min: min_chars,
            actual,
        });
    }
    Ok(trimmed)
}

/// Rank paragraphs of every document in `corpus` against `query`.
///
/// Returns at most [`MAX_RESULTS`] hits sorted by descending score. Equal
/// scores keep encounter order: corpus order, then section order, then
/// paragraph order. A blank query or a query without matches yields an
/// empty list.
#[must_use]
pub fn search(query: &str, corpus: &DocumentCorpus) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let terms = query_terms(query);

    let mut hits: Vec<SearchHit> = Vec::new();
    for (document_name, body) in corpus {
        for section in split_sections(body) {
            for paragraph in &section.paragraphs {
                let relevance_score = score(query, &terms, paragraph);
                if relevance_score <= SCORE_THRESHOLD {
                    continue;
                }
                hits.push(SearchHit {
                    document_name: document_name.clone(),
                    relevance_score,
                    snippet: extract_snippet(paragraph, &terms, &section.title),
                });
            }
        }
    }

    let candidates = hits.len();
    // Stable sort: ties keep encounter order.
    hits.sort_by(|left, right| {
        right
            .relevance_score
            .partial_cmp(&left.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    hits.truncate(MAX_RESULTS);
    tracing::debug!(
        query,
        documents = corpus.len(),
        candidates,
        returned = hits.len(),
        "memory bank search finished"
    );
    hits
}
