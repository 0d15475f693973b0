//! Rules document schema extraction and document templates.
//!
//! A rules document describes each document type under a numbered heading:
//!
//! ```text
//! ### 2. Product Context (productContext.md)
//! **Purpose**: Why this project exists
//! **When to Update**: When requirements change
//! **Structure**:
//! - Problem Statement
//! - User Experience Goals
//! **Commands**:
//! - `update_document productContext`
//! ```

mod parser;
mod template;

use serde::{Deserialize, Serialize};

pub(crate) use self::parser::parse_heading;
pub use self::parser::{extract_all_schemas, extract_schema};
pub use self::template::{build_template, build_template_on};

const FALLBACK_UPDATE_TIMING: &str = "As needed";
const FALLBACK_SECTION: &str = "No specific structure defined";

/// Structural guidance for one document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSchema {
    /// Document type the schema describes.
    pub document_type: String,
    /// One-line purpose statement.
    pub purpose: String,
    /// Update cadence.
    pub update_timing: String,
    /// Required `##` sections, in rules-document order.
    pub required_sections: Vec<String>,
    /// Commands associated with the document.
    pub commands: Vec<String>,
}

impl DocumentSchema {
    /// Defaults used when the rules document does not describe a type.
    #[must_use]
    pub fn fallback(document_type: &str) -> Self {
        Self {
            document_type: document_type.to_string(),
            purpose: format!("Documentation for {document_type}"),
            update_timing: FALLBACK_UPDATE_TIMING.to_string(),
            required_sections: vec![FALLBACK_SECTION.to_string()],
            commands: vec![format!("update_document {document_type}")],
        }
    }
}
