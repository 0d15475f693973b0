//! Consistency checks of memory bank documents against the rules schema.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DocumentCorpus;
use crate::document::{DocumentType, last_updated_marker};
use crate::schema::{extract_schema, parse_heading};

/// Documents last updated this many days ago or earlier need review.
pub const STALE_AFTER_DAYS: i64 = 30;

/// Outcome of checking one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsistencyStatus {
    /// All required sections present and recently updated.
    Good,
    /// Missing sections or stale `Last Updated` marker.
    NeedsUpdate,
}

/// Status and recommendation for one known document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Canonical document type name.
    pub document_type: String,
    /// Overall status.
    pub status: ConsistencyStatus,
    /// Human-readable next step.
    pub recommendation: String,
}

fn has_section(body: &str, section: &str) -> bool {
    let wanted = section.trim().to_lowercase();
    body.lines()
        .filter_map(parse_heading)
        .any(|(level, text)| level >= 2 && text.to_lowercase().starts_with(&wanted))
}

/// Missing, unparsable, or old `Last Updated` markers all count as stale.
fn needs_refresh(body: &str, today: NaiveDate) -> bool {
    let Some(raw) = last_updated_marker(body) else {
        return true;
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(updated) => (today - updated).num_days() >= STALE_AFTER_DAYS,
        Err(_) => true,
    }
}

fn check_document(rules_text: &str, kind: DocumentType, body: &str, today: NaiveDate) -> ConsistencyReport {
    let schema = extract_schema(rules_text, kind.as_str());
    let missing: Vec<&str> = schema
        .required_sections
        .iter()
        .map(String::as_str)
        .filter(|section| !has_section(body, section))
        .collect();

    let (status, recommendation) = if !missing.is_empty() {
        (
            ConsistencyStatus::NeedsUpdate,
            format!("Add missing sections: {}", missing.join(", ")),
        )
    } else if needs_refresh(body, today) {
        (
            ConsistencyStatus::NeedsUpdate,
            format!(
                "Document has not been updated in the last {STALE_AFTER_DAYS} days; review and refresh it"
            ),
        )
    } else {
        (
            ConsistencyStatus::Good,
            "Document follows the rules structure and is up to date".to_string(),
        )
    };

    ConsistencyReport {
        document_type: kind.as_str().to_string(),
        status,
        recommendation,
    }
}

/// Check every known document in `corpus` against `rules_text`, as of today.
#[must_use]
pub fn analyze(rules_text: &str, corpus: &DocumentCorpus) -> Vec<ConsistencyReport> {
    analyze_on(rules_text, corpus, Local::now().date_naive())
}

/// Check every known document in `corpus` against `rules_text`, as of `today`.
///
/// Entries whose name is not exactly a known document type are skipped. Missing
/// sections take priority over staleness in the recommendation.
#[must_use]
pub fn analyze_on(
    rules_text: &str,
    corpus: &DocumentCorpus,
    today: NaiveDate,
) -> Vec<ConsistencyReport> {
    let reports: Vec<ConsistencyReport> = corpus
        .iter()
        .filter_map(|(name, body)| {
            let kind = DocumentType::from_corpus_key(name)?;
            Some(check_document(rules_text, kind, body, today))
        })
        .collect();
    tracing::debug!(
        documents = corpus.len(),
        checked = reports.len(),
        needs_update = reports
            .iter()
            .filter(|report| report.status == ConsistencyStatus::NeedsUpdate)
            .count(),
        "memory bank analysis finished"
    );
    reports
}
