//! omni-memory-bank - Memory bank scaffolding for Markdown knowledge documents.
//!
//! Module layout (by domain):
//! - `search`: section-aware relevance scoring, snippets and ranking
//! - `schema`: rules document parsing and template generation
//! - `consistency`: structural and staleness checks against the rules schema
//! - `document`: the six known document types and `Last Updated` stamping
//! - `store`: filesystem-backed memory bank handle (corpus/rules suppliers)
//! - `settings`: YAML runtime settings
//!
//! The engine functions (`search`, `extract_schema`, `build_template`,
//! `analyze`) are pure: they borrow the corpus and rules text and never touch
//! the filesystem.
//!
//! # Examples
//!
//! ```rust
//! use omni_memory_bank::{DocumentCorpus, search};
//!
//! let mut corpus = DocumentCorpus::new();
//! corpus.insert(
//!     "techContext".to_string(),
//!     "## Stack\n\nWe use PostgreSQL for storage.".to_string(),
//! );
//!
//! let hits = search("PostgreSQL for storage", &corpus);
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].relevance_score - 1.0).abs() < f64::EPSILON);
//! ```

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Core domain modules
// ---------------------------------------------------------------------------
pub mod consistency;
pub mod document;
pub mod schema;
pub mod search;

// ---------------------------------------------------------------------------
// Collaborator layer (filesystem, settings, errors)
// ---------------------------------------------------------------------------
mod error;
pub mod settings;
pub mod store;

/// Mapping from document name to Markdown body.
///
/// Iteration order is the tie-break order for ranked search results.
pub type DocumentCorpus = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Public re-exports (crate API)
// ---------------------------------------------------------------------------
pub use consistency::{ConsistencyReport, ConsistencyStatus, STALE_AFTER_DAYS, analyze, analyze_on};
pub use document::{DocumentType, stamp_last_updated};
pub use error::{MemoryBankError, Result};
pub use schema::{
    DocumentSchema, build_template, build_template_on, extract_all_schemas, extract_schema,
};
pub use search::{
    MAX_RESULTS, SCORE_THRESHOLD, SearchHit, Section, extract_snippet, query_terms, score,
    search, split_sections, validate_query,
};
pub use settings::{MemoryBankSettings, load_settings, load_settings_from_file};
pub use store::{CorpusSource, MemoryBank};
