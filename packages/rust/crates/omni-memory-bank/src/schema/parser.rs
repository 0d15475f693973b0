//! Line-scanning parser over the rules document heading grammar.
//!
//! Grammar: `### <n>. <Type Name> (<type>.md)` opens a type section, which
//! runs until the next heading of level three or less. Inside it, fields use
//! bold labels (`**Purpose**:`) with either an inline value or a bullet list.

use super::DocumentSchema;
use crate::document::DocumentType;

const TYPE_HEADING_LEVEL: usize = 3;
const PURPOSE_LABEL: &str = "Purpose";
const UPDATE_TIMING_LABEL: &str = "When to Update";
const STRUCTURE_LABEL: &str = "Structure";
const COMMANDS_LABEL: &str = "Commands";
const FIELD_LABELS: [&str; 4] = [
    PURPOSE_LABEL,
    UPDATE_TIMING_LABEL,
    STRUCTURE_LABEL,
    COMMANDS_LABEL,
];

/// `### 2. Product Context (productContext.md)` split into label and file.
#[derive(Debug, PartialEq, Eq)]
struct NumberedHeading<'a> {
    label: &'a str,
    file_name: Option<&'a str>,
}

pub(crate) fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

fn parse_numbered_heading(text: &str) -> Option<NumberedHeading<'_>> {
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = text[digits..].strip_prefix('.')?.trim();
    if let Some(without_close) = rest.strip_suffix(')')
        && let Some((label, file_name)) = without_close.rsplit_once('(')
    {
        return Some(NumberedHeading {
            label: label.trim(),
            file_name: Some(file_name.trim()),
        });
    }
    Some(NumberedHeading {
        label: rest,
        file_name: None,
    })
}

fn heading_matches(heading: &NumberedHeading<'_>, document_type: &str) -> bool {
    let wanted = document_type.trim();
    if wanted.is_empty() {
        return false;
    }
    let wanted_lower = wanted.to_lowercase();
    let label_lower = heading.label.to_lowercase();
    let compact_label: String = label_lower.split_whitespace().collect();
    let spaced_type = wanted.replace("Context", " Context").to_lowercase();

    compact_label == wanted_lower
        || label_lower.starts_with(spaced_type.trim())
        || heading
            .file_name
            .is_some_and(|file| file.eq_ignore_ascii_case(&format!("{wanted_lower}.md")))
}

/// Lines belonging to the type section of `document_type`, if present.
fn type_section<'a>(rules_text: &'a str, document_type: &str) -> Option<Vec<&'a str>> {
    let mut capturing = false;
    let mut span: Vec<&str> = Vec::new();
    for line in rules_text.lines() {
        if let Some((level, text)) = parse_heading(line) {
            if capturing {
                if level <= TYPE_HEADING_LEVEL {
                    break;
                }
            } else {
                capturing = level == TYPE_HEADING_LEVEL
                    && parse_numbered_heading(text)
                        .is_some_and(|heading| heading_matches(&heading, document_type));
                continue;
            }
        }
        if capturing {
            span.push(line);
        }
    }
    capturing.then_some(span)
}

fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let marker_len = if trimmed.starts_with(['-', '*', '+']) {
        1
    } else {
        let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 || !trimmed[digits..].starts_with('.') {
            return None;
        }
        digits + 1
    };
    let rest = &trimmed[marker_len..];
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

/// Value after `**Label**:` (or `**Label:**`), bullet prefix allowed.
fn bold_label_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let content = strip_bullet(line).unwrap_or_else(|| line.trim());
    let rest = content.strip_prefix("**")?;
    let (name, after) = rest.split_once("**")?;
    let (name, value) = match name.strip_suffix(':') {
        Some(name) => (name, after),
        None => (name, after.strip_prefix(':')?),
    };
    name.trim().eq_ignore_ascii_case(label).then(|| value.trim())
}

fn is_field_label(line: &str) -> bool {
    FIELD_LABELS
        .iter()
        .any(|label| bold_label_value(line, label).is_some())
}

fn inline_field(span: &[&str], label: &str) -> Option<String> {
    span.iter()
        .find_map(|line| bold_label_value(line, label))
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Bullet items following the `label` line, up to the first non-bullet line.
fn list_field<'a>(span: &[&'a str], label: &str) -> Vec<&'a str> {
    let Some(start) = span
        .iter()
        .position(|line| bold_label_value(line, label).is_some())
    else {
        return Vec::new();
    };
    let mut items: Vec<&str> = Vec::new();
    for &line in &span[start + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        if is_field_label(line) {
            break;
        }
        match strip_bullet(line) {
            Some(item) if !item.is_empty() => items.push(item),
            Some(_) => {}
            None => break,
        }
    }
    items
}

fn backtick_token(item: &str) -> Option<&str> {
    let (_, rest) = item.split_once('`')?;
    let (token, _) = rest.split_once('`')?;
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Extract the schema for `document_type` from `rules_text`.
///
/// Matching is case-insensitive against the numbered heading label (with
/// spaces ignored or `Context` split off) or the parenthesised file name.
/// Every field missing from the rules document falls back to the values of
/// [`DocumentSchema::fallback`]; this never fails.
#[must_use]
pub fn extract_schema(rules_text: &str, document_type: &str) -> DocumentSchema {
    let fallback = DocumentSchema::fallback(document_type);
    let Some(span) = type_section(rules_text, document_type) else {
        tracing::debug!(document_type, "rules document has no section for type; using defaults");
        return fallback;
    };

    let required_sections: Vec<String> = list_field(&span, STRUCTURE_LABEL)
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let commands: Vec<String> = list_field(&span, COMMANDS_LABEL)
        .into_iter()
        .filter_map(backtick_token)
        .map(ToString::to_string)
        .collect();

    DocumentSchema {
        document_type: fallback.document_type,
        purpose: inline_field(&span, PURPOSE_LABEL).unwrap_or(fallback.purpose),
        update_timing: inline_field(&span, UPDATE_TIMING_LABEL).unwrap_or(fallback.update_timing),
        required_sections: if required_sections.is_empty() {
            fallback.required_sections
        } else {
            required_sections
        },
        commands: if commands.is_empty() {
            fallback.commands
        } else {
            commands
        },
    }
}

/// Schemas for all known document types, in canonical order.
#[must_use]
pub fn extract_all_schemas(rules_text: &str) -> Vec<DocumentSchema> {
    DocumentType::ALL
        .iter()
        .map(|kind| extract_schema(rules_text, kind.as_str()))
        .collect()
}
