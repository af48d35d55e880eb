//! Query-term emphasis with HTML escaping.
//!
//! Escaping runs before any wrapping so literal query text containing
//! markup-unsafe characters can never break the injected emphasis tags.

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Escape the five HTML-unsafe characters. `&` goes first so later
/// replacements cannot be double-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape `text`, then wrap every case-insensitive occurrence of each
/// whitespace-separated query token in `<mark>`.
///
/// Tokens apply in original query order against the already-modified
/// string, matching the host widget's behavior: order affects nesting, not
/// which characters end up flagged.
pub fn highlight(text: &str, query: &str) -> String {
    let mut out = escape_html(text);
    for token in query.split_whitespace() {
        // The haystack is escaped, so the token must be compared in escaped
        // form too: a literal "&" in the query matches "&amp;" in the text.
        let escaped = escape_html(token);
        out = wrap_occurrences(&out, &escaped);
    }
    out
}

/// Wrap each case-insensitive occurrence of `needle`, preserving the
/// original casing of the matched span.
fn wrap_occurrences(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let hay: Vec<char> = haystack.chars().collect();
    let hay_lower: Vec<char> = lowered(haystack);
    let needle_lower: Vec<char> = lowered(needle);
    if needle_lower.len() > hay.len() {
        return haystack.to_string();
    }

    let mut out = String::with_capacity(haystack.len());
    let mut i = 0;
    while i < hay.len() {
        let end = i + needle_lower.len();
        if end <= hay.len() && hay_lower[i..end] == needle_lower[..] {
            out.push_str(MARK_OPEN);
            out.extend(&hay[i..end]);
            out.push_str(MARK_CLOSE);
            i = end;
        } else {
            out.push(hay[i]);
            i += 1;
        }
    }
    out
}

/// Char-count-preserving lowercase, for position-stable comparison.
fn lowered(s: &str) -> Vec<char> {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}
