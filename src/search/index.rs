//! Term-frequency index over the normalized document corpus.
//!
//! Postings carry one pre-computed score per field (title, text); the field
//! boosts are applied at query time so the index itself stays
//! boost-agnostic. Vocabulary lives in an ordered map because query tokens
//! match indexed terms by prefix, the way the lexical engine this replaces
//! behaved.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use ahash::AHashMap;
use rust_stemmers::Stemmer;

use super::tokenize::{stemmer, tokenize_and_stem};
use crate::config::FieldBoosts;
use crate::types::{Document, Hit};

/// Per-document entry in a term's posting list.
#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: usize,
    /// Length-normalized TF-IDF contribution of the title field.
    title: f32,
    /// Length-normalized TF-IDF contribution of the text field.
    text: f32,
}

/// Immutable ranked-retrieval index, built once per page load.
#[derive(Debug)]
pub struct SearchIndex {
    vocab: BTreeMap<String, Vec<Posting>>,
    docs: Vec<Document>,
}

impl SearchIndex {
    /// Ranked search for a free-text query.
    ///
    /// Tokens are stemmed like indexed terms and expanded by vocabulary
    /// prefix, so `"cach"` reaches both `"caching"` and `"caches"`. Hits
    /// come back in descending combined score, stable on document order for
    /// exact ties, capped at `limit`.
    pub fn search(&self, query: &str, boosts: FieldBoosts, limit: usize) -> Vec<Hit> {
        let stemmer = stemmer();
        let tokens = tokenize_and_stem(query, &stemmer);
        if tokens.is_empty() {
            return vec![];
        }

        // BTreeMap keyed by doc index keeps accumulation deterministic.
        let mut combined: BTreeMap<usize, f32> = BTreeMap::new();
        for token in &tokens {
            for posting in self.postings_with_prefix(token) {
                *combined.entry(posting.doc).or_insert(0.0) +=
                    boosts.title * posting.title + boosts.text * posting.text;
            }
        }

        let mut hits: Vec<Hit> = combined
            .into_iter()
            .map(|(doc, score)| Hit {
                document: self.docs[doc].clone(),
                score,
            })
            .collect();

        // Stable sort: equal scores keep ascending document order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        hits
    }

    /// All postings of vocabulary terms starting with `prefix`.
    fn postings_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Posting> {
        self.vocab
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
            .flat_map(|(_, postings)| postings.iter())
    }

    pub fn term_count(&self) -> usize {
        self.vocab.len()
    }

    pub fn document_count(&self) -> usize {
        self.docs.len()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }
}

/// Accumulates per-field term frequencies before TF-IDF finalization.
pub(crate) struct IndexBuilder {
    /// (term, doc) → (title_tf, text_tf)
    term_docs: HashMap<(String, usize), (f32, f32)>,
    /// Per-document field lengths for normalization: (title_len, text_len).
    field_lengths: Vec<(usize, usize)>,
    docs: Vec<Document>,
    stemmer: Stemmer,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self {
            term_docs: HashMap::default(),
            field_lengths: Vec::new(),
            docs: Vec::new(),
            stemmer: stemmer(),
        }
    }
}

impl IndexBuilder {
    /// Insert one normalized document into the index under construction.
    pub(crate) fn insert(&mut self, doc: Document) {
        let doc_id = self.docs.len();

        let title_counts = count_terms(&doc.title, &self.stemmer);
        let text_counts = count_terms(&doc.text, &self.stemmer);
        let title_len: usize = title_counts.values().sum();
        let text_len: usize = text_counts.values().sum();
        self.field_lengths.push((title_len, text_len));

        for (term, count) in title_counts {
            self.term_docs.entry((term, doc_id)).or_insert((0.0, 0.0)).0 += count as f32;
        }
        for (term, count) in text_counts {
            self.term_docs.entry((term, doc_id)).or_insert((0.0, 0.0)).1 += count as f32;
        }

        self.docs.push(doc);
    }

    /// Compute IDF-weighted scores and produce the final searchable index.
    ///
    /// Per field: score = (1 + ln(tf / length_norm)) * ln(1 + N/df), clamped
    /// at zero. `length_norm` is the field length relative to the corpus
    /// average, floored at 0.5 to keep short documents from dominating.
    pub(crate) fn finalize(self) -> SearchIndex {
        let start = std::time::Instant::now();
        let total_docs = self.docs.len() as f32;

        let (title_total, text_total) = self
            .field_lengths
            .iter()
            .fold((0usize, 0usize), |(t, x), (a, b)| (t + a, x + b));
        let avg_title_len = average(title_total, self.field_lengths.len());
        let avg_text_len = average(text_total, self.field_lengths.len());

        // Group the flat (term, doc) map by term to compute document
        // frequencies.
        let mut grouped: BTreeMap<String, Vec<(usize, f32, f32)>> = BTreeMap::new();
        for ((term, doc), (title_tf, text_tf)) in self.term_docs {
            grouped.entry(term).or_default().push((doc, title_tf, text_tf));
        }

        let mut vocab: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        for (term, mut doc_scores) in grouped {
            doc_scores.sort_by_key(|(doc, _, _)| *doc);

            let doc_freq = doc_scores.len() as f32;
            let idf = (1.0 + total_docs / doc_freq).ln();

            let postings = doc_scores
                .into_iter()
                .map(|(doc, title_tf, text_tf)| {
                    let (title_len, text_len) = self.field_lengths[doc];
                    Posting {
                        doc,
                        title: field_score(title_tf, title_len, avg_title_len, idf),
                        text: field_score(text_tf, text_len, avg_text_len, idf),
                    }
                })
                .collect();
            vocab.insert(term, postings);
        }

        let index = SearchIndex {
            vocab,
            docs: self.docs,
        };
        tracing::info!(
            "Built search index: {} unique terms, {} documents in {:?}",
            index.term_count(),
            index.document_count(),
            start.elapsed()
        );
        index
    }
}

fn average(total: usize, count: usize) -> f32 {
    if count == 0 {
        1.0
    } else {
        (total as f32 / count as f32).max(1.0)
    }
}

/// TF-IDF score of one field, zero when the term is absent from it.
fn field_score(tf: f32, field_len: usize, avg_len: f32, idf: f32) -> f32 {
    if tf <= 0.0 {
        return 0.0;
    }
    let length_norm = (field_len as f32 / avg_len).max(0.5);
    let tf_normalized = tf / length_norm;
    ((1.0 + tf_normalized.ln()) * idf).max(0.0)
}

/// Count stemmed term frequencies in one field.
fn count_terms(field: &str, stemmer: &Stemmer) -> AHashMap<String, usize> {
    let words = tokenize_and_stem(field, stemmer);
    let mut counts: AHashMap<String, usize> = AHashMap::with_capacity(words.len());
    for word in words {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}
