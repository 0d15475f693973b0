use chrono::{Local, NaiveDate};

use super::DocumentSchema;
use crate::document::title_from_name;

/// Skeleton body for `document_type`, dated today (local time).
#[must_use]
pub fn build_template(schema: &DocumentSchema, document_type: &str) -> String {
    build_template_on(schema, document_type, Local::now().date_naive())
}

/// Skeleton body for `document_type` with an explicit `Last Updated` date.
///
/// Layout: title, blockquoted purpose and date, one `##` block per required
/// section in schema order, then a note naming the update cadence.
#[must_use]
pub fn build_template_on(schema: &DocumentSchema, document_type: &str, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", title_from_name(document_type)));
    out.push_str(&format!("> {}\n", schema.purpose));
    out.push_str(&format!("> Last Updated: {}\n\n", date.format("%Y-%m-%d")));
    for section in &schema.required_sections {
        out.push_str(&format!("## {section}\n\n[{section} content]\n\n"));
    }
    out.push_str("---\n\n");
    out.push_str(&format!("*Update this document: {}*\n", schema.update_timing));
    out
}
