//! Tokenization and stemming shared by indexing and query parsing.

use rust_stemmers::{Algorithm, Stemmer};

/// Common English stop words filtered from indexing.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Split text on non-alphanumeric boundaries, lowercase, stem, and drop
/// stop words. Index terms and query terms both go through this path so the
/// two vocabularies agree.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .filter_map(|w| stem_token(w, stemmer))
        .collect()
}

/// Lowercase and stem one token, filtering stop words.
pub(crate) fn stem_token(token: &str, stemmer: &Stemmer) -> Option<String> {
    let lowercase = token.to_lowercase();
    if STOP_WORDS.contains(&lowercase.as_str()) {
        return None;
    }
    Some(stemmer.stem(&lowercase).into_owned())
}

/// Shared stemmer constructor; the corpus language is English-stemmed even
/// for mixed-language sites, which degrades to identity for non-Latin text.
pub(crate) fn stemmer() -> Stemmer {
    Stemmer::create(Algorithm::English)
}
