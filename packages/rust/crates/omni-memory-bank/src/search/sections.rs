/// Titled span of a document, split into paragraphs for independent scoring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    /// Heading text, or the first line of the text before the first
    /// heading as written; may be empty.
    pub title: String,
    /// Non-empty paragraphs in document order.
    pub paragraphs: Vec<String>,
}

/// Heading text when `line` opens a `##` or `###` section.
fn section_heading(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|ch| *ch == '#').count();
    if !(2..=3).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn split_paragraphs(body: &str) -> Vec<String> {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            push_paragraph(&mut paragraphs, &current);
            current.clear();
            continue;
        }
        current.push(line);
    }
    push_paragraph(&mut paragraphs, &current);
    paragraphs
}

fn push_paragraph(out: &mut Vec<String>, lines: &[&str]) {
    let paragraph = lines.join("\n").trim().to_string();
    if !paragraph.is_empty() {
        out.push(paragraph);
    }
}

fn push_section(out: &mut Vec<Section>, lines: &[&str]) {
    let chunk = lines.join("\n");
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return;
    }
    let (first_line, body) = chunk.split_once('\n').unwrap_or((chunk, ""));
    out.push(Section {
        title: first_line.trim().to_string(),
        paragraphs: split_paragraphs(body),
    });
}

/// Split a document body on `##`/`###` headings.
///
/// Text before the first heading forms its own chunk. In every chunk the
/// first line is the title and the remainder splits into paragraphs on
/// blank-line runs. Only `##`/`###` heading lines lose their markers; a
/// leading `# Title` line keeps them. Blank chunks are dropped; document order is kept.
#[must_use]
pub fn split_sections(document: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current_lines: Vec<&str> = Vec::new();

    for line in document.lines() {
        if let Some(heading) = section_heading(line) {
            push_section(&mut sections, &current_lines);
            current_lines.clear();
            current_lines.push(heading);
            continue;
        }
        current_lines.push(line);
    }
    push_section(&mut sections, &current_lines);
    sections
}
