//! Snippet selection: the bounded window of text with the highest
//! query-term density, snapped to word boundaries.

/// Ellipsis marker affixed to truncated snippets.
pub const ELLIPSIS: &str = "…";

/// Extract the best snippet of at most `max_len` characters.
///
/// Empty text yields an empty snippet; an empty query (or one with no
/// occurrence in `text`) yields the leading `max_len` characters. Otherwise
/// the window with the most query-token occurrences wins, ties broken by
/// earliest position. Edges snap to the nearest space within `tolerance`
/// characters so words are not cut mid-way, and ellipsis markers flag
/// truncation on either side. All positions are character-based, so
/// multi-byte text never splits.
pub fn extract_snippet(
    text: &str,
    query: &str,
    max_len: usize,
    lead_in: usize,
    tolerance: usize,
) -> String {
    if text.is_empty() || max_len == 0 {
        return String::new();
    }
    let chars: Vec<char> = text.chars().collect();

    let positions = match_positions(&chars, query);
    let Some(anchor) = densest_window_start(&positions, max_len) else {
        // No query or no occurrences: plain leading slice.
        return chars.iter().take(max_len).collect();
    };

    let mut start = anchor.saturating_sub(lead_in);
    let mut end = (start + max_len).min(chars.len());

    // Snap the leading edge forward to just after a space.
    if start > 0 && !boundary_before(&chars, start) {
        if let Some(space) = (start..(start + tolerance).min(end)).find(|&i| chars[i] == ' ') {
            start = space + 1;
        }
    }
    // Snap the trailing edge back to just before a space.
    if end < chars.len() && !boundary_before(&chars, end) {
        if let Some(space) = (end.saturating_sub(tolerance)..end)
            .rev()
            .find(|&i| chars[i] == ' ')
        {
            end = space;
        }
    }

    let body: String = chars[start..end].iter().collect();
    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(body.trim());
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Character positions of every occurrence of every query token, sorted.
fn match_positions(chars: &[char], query: &str) -> Vec<usize> {
    let lowered: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    let mut positions = Vec::new();
    for token in query.split_whitespace() {
        let needle: Vec<char> = token
            .chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect();
        if needle.is_empty() || needle.len() > lowered.len() {
            continue;
        }
        for i in 0..=(lowered.len() - needle.len()) {
            if lowered[i..i + needle.len()] == needle[..] {
                positions.push(i);
            }
        }
    }
    positions.sort_unstable();
    positions
}

/// Start position of the `max_len`-wide window covering the most matches.
/// `None` when there are no matches at all.
fn densest_window_start(positions: &[usize], max_len: usize) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None; // (count, start)
    for (i, &start) in positions.iter().enumerate() {
        let count = positions[i..]
            .iter()
            .take_while(|&&p| p < start + max_len)
            .count();
        // Strict comparison keeps the earliest window on ties.
        if best.is_none_or(|(c, _)| count > c) {
            best = Some((count, start));
        }
    }
    best.map(|(_, start)| start)
}

fn boundary_before(chars: &[char], i: usize) -> bool {
    i == 0 || chars[i - 1] == ' ' || chars.get(i).copied() == Some(' ')
}
