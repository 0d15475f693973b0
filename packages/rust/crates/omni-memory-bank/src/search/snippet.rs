/// Approximate snippet length in characters before word widening.
const SNIPPET_TARGET_CHARS: usize = 150;
/// Lookahead used when counting terms around a candidate offset.
const TERM_WINDOW_CHARS: usize = 100;
/// Context kept before the densest offset.
const LEAD_IN_CHARS: usize = 30;
const ELLIPSIS: &str = "...";

fn is_word_boundary(ch: char) -> bool {
    ch == ' ' || ch == '\n'
}

/// Lower-cased `chars` with the byte offset where each source char's
/// lower-case form starts; the extra trailing entry is the total length.
///
/// Characters whose lower-case form is several chars (`İ`) keep all of
/// them, matching `str::to_lowercase` on the query side.
fn lower_view(chars: &[char]) -> (String, Vec<usize>) {
    let mut lower = String::with_capacity(chars.len());
    let mut starts: Vec<usize> = Vec::with_capacity(chars.len() + 1);
    for ch in chars {
        starts.push(lower.len());
        lower.extend(ch.to_lowercase());
    }
    starts.push(lower.len());
    (lower, starts)
}

/// First offset whose lookahead window holds the most distinct terms.
///
/// Every character offset is scanned, so the cost is
/// `O(len * terms * window)`. Paragraphs are documentation prose with a
/// handful of terms; the exhaustive scan keeps the first-offset tie-break
/// exact.
fn densest_offset(lower: &str, starts: &[usize], terms: &[&str]) -> usize {
    let len = starts.len().saturating_sub(1);
    let mut best_offset = 0usize;
    let mut best_count = 0usize;
    for offset in 0..len {
        let window_end = (offset + TERM_WINDOW_CHARS).min(len);
        let window = &lower[starts[offset]..starts[window_end]];
        let count = terms.iter().filter(|term| window.contains(**term)).count();
        if count > best_count {
            best_count = count;
            best_offset = offset;
        }
    }
    best_offset
}

/// Word-safe excerpt of `paragraph` around its densest cluster of `terms`.
///
/// The window starts 30 characters before the densest offset, spans about
/// 150 characters, and is widened on both sides to the nearest space or
/// newline. Cut sides are marked with `...`. A non-empty `title` is
/// prepended as a bold label.
#[must_use]
pub fn extract_snippet(paragraph: &str, terms: &[String], title: &str) -> String {
    let chars: Vec<char> = paragraph.chars().collect();
    let (lower, starts) = lower_view(&chars);
    let mut distinct: Vec<&str> = Vec::with_capacity(terms.len());
    for term in terms.iter().map(String::as_str) {
        if !term.is_empty() && !distinct.contains(&term) {
            distinct.push(term);
        }
    }

    let len = chars.len();
    let mut start = densest_offset(&lower, &starts, &distinct).saturating_sub(LEAD_IN_CHARS);
    let mut end = (start + SNIPPET_TARGET_CHARS).min(len);
    while start > 0 && !is_word_boundary(chars[start - 1]) {
        start -= 1;
    }
    while end < len && !is_word_boundary(chars[end]) {
        end += 1;
    }

    let window: String = chars[start..end].iter().collect();
    let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(window.trim_matches(is_word_boundary));
    if end < len {
        snippet.push_str(ELLIPSIS);
    }

    if title.is_empty() {
        snippet
    } else {
        format!("**{title}**: {snippet}")
    }
}
