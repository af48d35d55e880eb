//! Markup stripping for corpus fields before indexing.
//!
//! Corpus text arrives with markdown and leftover HTML. Code regions are
//! dropped entirely because syntax noise pollutes both ranking and snippets;
//! everything else collapses to its plain-text content.

use regex::Regex;
use std::sync::LazyLock;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static PRE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)<pre\b.*?</pre>").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]+>").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static UNDERSCORE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_]+)_\b").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*(?:#{1,6}\s+)+").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup and formatting artifacts from a raw corpus field.
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let s = FENCED_CODE.replace_all(raw, " ");
    let s = PRE_BLOCK.replace_all(&s, " ");
    let s = INLINE_CODE.replace_all(&s, " ");
    let s = HTML_TAG.replace_all(&s, " ");
    // Asterisk emphasis first: removing markers must never expose a fresh
    // heading or link form to a later pass.
    let s = s.replace('*', "");
    let s = UNDERSCORE_EMPHASIS.replace_all(&s, "$1");
    let s = IMAGE.replace_all(&s, "$1");
    let s = LINK.replace_all(&s, "$1");
    let s = HEADING.replace_all(&s, "");
    let s = WHITESPACE.replace_all(&s, " ");
    s.trim().to_string()
}
