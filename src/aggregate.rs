//! Merges raw per-section hits into page-level result groups.

use std::collections::HashMap;

use crate::config::SearchConfig;
use crate::types::{Hit, ResultGroup, Section};

/// Groups hits by base location and orders them for display.
pub struct Aggregator {
    config: SearchConfig,
}

impl Aggregator {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Deterministically aggregate an ordered hit list into result groups.
    ///
    /// Groups preserve first-seen hit order for score ties; listing pages
    /// (tag indexes and the like) sort after content pages but are never
    /// dropped.
    pub fn aggregate(&self, hits: &[Hit]) -> Vec<ResultGroup> {
        let mut groups: Vec<PendingGroup> = Vec::new();
        let mut by_base: HashMap<String, usize> = HashMap::new();

        for hit in hits {
            let doc = &hit.document;
            let base = doc.base_location().to_string();
            let slot = *by_base.entry(base.clone()).or_insert_with(|| {
                groups.push(PendingGroup::new(base));
                groups.len() - 1
            });
            groups[slot].absorb(hit);
        }

        let mut groups: Vec<ResultGroup> = groups
            .into_iter()
            .map(|g| g.finish(&self.config))
            .collect();

        // Content pages first, then listing pages, each tier by descending
        // top score. The sort is stable, so exact float ties keep the
        // first-seen order instead of reordering nondeterministically.
        groups.sort_by(|a, b| {
            a.is_index_page
                .cmp(&b.is_index_page)
                .then_with(|| b.top_score.total_cmp(&a.top_score))
        });
        groups
    }
}

/// Group under construction, before section filtering and ordering.
struct PendingGroup {
    base_location: String,
    page_title: Option<String>,
    page_text: Option<String>,
    sections: Vec<Section>,
    top_score: f32,
}

impl PendingGroup {
    fn new(base_location: String) -> Self {
        Self {
            base_location,
            page_title: None,
            page_text: None,
            sections: Vec::new(),
            top_score: 0.0,
        }
    }

    fn absorb(&mut self, hit: &Hit) {
        let doc = &hit.document;
        if !doc.is_fragment() {
            // The fragment-less record is the page itself; its title and
            // text become the group header.
            if !doc.title.is_empty() {
                self.page_title = Some(doc.title.clone());
            }
            if !doc.text.is_empty() {
                self.page_text = Some(doc.text.clone());
            }
        }
        self.top_score = self.top_score.max(hit.score);
        self.sections.push(Section {
            location: doc.location.clone(),
            title: doc.title.clone(),
            text: doc.text.clone(),
            score: hit.score,
        });
    }

    fn finish(self, config: &SearchConfig) -> ResultGroup {
        // Title fallback chain: page record, first section, bare location.
        // Only the first section is consulted; an untitled first section
        // falls straight through to the location.
        let page_title = self
            .page_title
            .or_else(|| {
                self.sections
                    .first()
                    .map(|s| s.title.clone())
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| self.base_location.clone());

        let page_text = self.page_text.or_else(|| {
            self.sections
                .iter()
                .map(|s| s.text.clone())
                .find(|t| !t.is_empty())
        });

        // The page's own record is already represented by the group header,
        // as is any section whose title merely repeats it.
        let page_title_lower = page_title.to_lowercase();
        let mut sections: Vec<Section> = self
            .sections
            .into_iter()
            .filter(|s| s.location != self.base_location)
            .filter(|s| s.title.to_lowercase() != page_title_lower)
            .collect();
        sections.sort_by(|a, b| b.score.total_cmp(&a.score));

        let hidden_sections = sections.len().saturating_sub(config.section_cap);
        sections.truncate(config.section_cap);

        let is_index_page = config.is_index_page(&self.base_location);

        ResultGroup {
            base_location: self.base_location,
            page_title,
            page_text,
            sections,
            hidden_sections,
            top_score: self.top_score,
            is_index_page,
        }
    }
}
