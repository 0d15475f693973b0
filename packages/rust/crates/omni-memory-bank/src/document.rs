//! Known memory bank document types and `Last Updated` markers.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::MemoryBankError;

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

/// `Last Updated: <value>`, tolerating bold decoration around label or value.
static LAST_UPDATED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)last updated\**\s*:\s*\**\s*([^\s*]+)"));

/// One of the six documents every memory bank carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    /// Foundation document shaping all others.
    #[serde(rename = "projectbrief")]
    ProjectBrief,
    /// Why the project exists and how it should work.
    #[serde(rename = "productContext")]
    ProductContext,
    /// Current work focus and recent changes.
    #[serde(rename = "activeContext")]
    ActiveContext,
    /// Architecture and design patterns in use.
    #[serde(rename = "systemPatterns")]
    SystemPatterns,
    /// Technologies, setup and constraints.
    #[serde(rename = "techContext")]
    TechContext,
    /// What works, what is left, known issues.
    #[serde(rename = "progress")]
    Progress,
}

impl DocumentType {
    /// All known types in canonical order.
    pub const ALL: [Self; 6] = [
        Self::ProjectBrief,
        Self::ProductContext,
        Self::ActiveContext,
        Self::SystemPatterns,
        Self::TechContext,
        Self::Progress,
    ];

    /// Corpus key and file stem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectBrief => "projectbrief",
            Self::ProductContext => "productContext",
            Self::ActiveContext => "activeContext",
            Self::SystemPatterns => "systemPatterns",
            Self::TechContext => "techContext",
            Self::Progress => "progress",
        }
    }

    /// Type whose corpus key is exactly `name`.
    ///
    /// Unlike [`FromStr`], no case folding or `.md` suffix is accepted.
    #[must_use]
    pub fn from_corpus_key(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// File name inside the memory bank directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.md", self.as_str())
    }

    /// Human-readable title, e.g. `Product Context`.
    #[must_use]
    pub fn title(self) -> String {
        title_from_name(self.as_str())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = MemoryBankError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let stem = trimmed.strip_suffix(".md").unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(stem))
            .ok_or_else(|| MemoryBankError::UnknownDocumentType(raw.to_string()))
    }
}

/// Space out internal capitals and upper-case the first letter.
pub(crate) fn title_from_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if index == 0 {
            out.extend(ch.to_uppercase());
            continue;
        }
        if ch.is_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Raw value of the first `Last Updated` marker, if any.
pub(crate) fn last_updated_marker(content: &str) -> Option<&str> {
    LAST_UPDATED_REGEX
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str())
}

/// Refresh the `Last Updated` marker of `content` to `date`.
///
/// The first existing marker is rewritten in place. Without one, a
/// `> Last Updated:` line is inserted after the leading `#` title (or at the
/// top when the document has no title).
#[must_use]
pub fn stamp_last_updated(content: &str, date: NaiveDate) -> String {
    let stamp = date.format("%Y-%m-%d").to_string();
    if let Some(value) = LAST_UPDATED_REGEX.captures(content).and_then(|caps| caps.get(1)) {
        let mut out = String::with_capacity(content.len());
        out.push_str(&content[..value.start()]);
        out.push_str(&stamp);
        out.push_str(&content[value.end()..]);
        return out;
    }

    let marker = format!("> Last Updated: {stamp}");
    let mut lines: Vec<&str> = content.lines().collect();
    let title_index = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .filter(|&index| lines[index].trim_start().starts_with("# "));
    match title_index {
        Some(index) => {
            lines.insert(index + 1, "");
            lines.insert(index + 2, &marker);
        }
        None => {
            lines.insert(0, &marker);
            lines.insert(1, "");
        }
    }
    let mut out = lines.join("\n");
    if content.ends_with('\n') {
        out.push('\n');
    }
    out
}
