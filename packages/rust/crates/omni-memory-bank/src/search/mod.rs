//! Section-aware search over a memory bank corpus.
//!
//! Pipeline: split each document into sections and paragraphs, score every
//! paragraph against the query, keep hits above [`SCORE_THRESHOLD`], and
//! merge them into one ranked list of at most [`MAX_RESULTS`].

mod engine;
mod scoring;
mod sections;
mod snippet;

pub use self::engine::{MAX_RESULTS, SCORE_THRESHOLD, SearchHit, search, validate_query};
pub use self::scoring::{query_terms, score};
pub use self::sections::{Section, split_sections};
pub use self::snippet::extract_snippet;
