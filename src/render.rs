//! Converts aggregated result groups into host markup and writes it into
//! the result container.

use std::fmt::Write as _;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::highlight::{escape_html, highlight};
use crate::snippet::extract_snippet;
use crate::types::{ResultGroup, SearchSession};

/// Write access to the host's result container and count display.
///
/// Implementations back this with the live page; tests use an in-memory
/// double.
pub trait ResultList: Send + Sync {
    /// Replace the container content, reporting what the write did. A
    /// write whose content equals what the container already holds fires
    /// no mutation in a live host and must report [`WriteOutcome::Unchanged`].
    fn write_results(&self, markup: &str) -> WriteOutcome;
    fn write_meta(&self, text: &str) -> bool;
}

/// What a container write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content replaced; the host will observe a mutation.
    Changed,
    /// Content was already identical; no mutation will fire.
    Unchanged,
    /// The container has detached from the page.
    Detached,
}

/// What a render pass produced, for keyboard-cursor clamping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOutcome {
    /// Number of activatable result links written (page headers plus
    /// visible sections).
    pub link_count: usize,
}

/// Builds result markup and writes it through a [`ResultList`].
///
/// Writes that change the container arm the session's self-write marker so
/// the host synchronizer can tell this sink's mutations from foreign ones.
/// An equal write fires no mutation event, so it must not arm the marker;
/// a stale marker would absorb the next foreign write unchallenged.
pub struct RenderSink {
    config: SearchConfig,
}

impl RenderSink {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Render `groups` into the container.
    ///
    /// Empty `groups` is the explicit zero-results state, visibly distinct
    /// from the idle state produced by [`RenderSink::clear`].
    pub fn render(
        &self,
        groups: &[ResultGroup],
        total_hits: usize,
        query: &str,
        list: &dyn ResultList,
        session: &mut SearchSession,
    ) -> Result<RenderOutcome, SearchError> {
        if groups.is_empty() {
            write_container(list, "", session)?;
            list.write_meta("No matching documents");
            return Ok(RenderOutcome::default());
        }

        let markup = self.build_markup(groups, query);
        let link_count = groups.iter().map(|g| 1 + g.sections.len()).sum();

        write_container(list, &markup, session)?;
        list.write_meta(&format!("{} pages, {} results", groups.len(), total_hits));
        tracing::debug!(
            "Rendered {} groups ({} links) for query '{}'",
            groups.len(),
            link_count,
            query
        );
        Ok(RenderOutcome { link_count })
    }

    /// Clear the container back to the idle state: no markup, no message.
    pub fn clear(&self, list: &dyn ResultList, session: &mut SearchSession) {
        let _ = write_container(list, "", session);
        list.write_meta("");
    }

    /// Result-list markup in the host widget's own format, so the ranked
    /// results inherit the page's styling.
    fn build_markup(&self, groups: &[ResultGroup], query: &str) -> String {
        let mut html = String::new();
        for group in groups {
            self.write_group(&mut html, group, query);
        }
        html
    }

    fn write_group(&self, html: &mut String, group: &ResultGroup, query: &str) {
        let page_url = escape_html(&self.config.page_url(&group.base_location));
        let title = highlight(&group.page_title, query);

        let _ = write!(
            html,
            r#"<li class="md-search-result__item"><a href="{page_url}" class="md-search-result__link" tabindex="-1"><article class="md-search-result__article md-search-result__article--document"><div class="md-search-result__icon md-icon"></div><h1 class="md-search-result__title">{title}</h1>"#,
        );
        if let Some(text) = &group.page_text {
            let teaser = self.teaser(text, query);
            let _ = write!(
                html,
                r#"<p class="md-search-result__teaser">{teaser}</p>"#
            );
        }
        html.push_str("</article></a>");

        for section in &group.sections {
            let url = escape_html(&self.config.page_url(&section.location));
            let sub_title = highlight(&section.title, query);
            let _ = write!(
                html,
                r#"<a href="{url}" class="md-search-result__link" tabindex="-1"><article class="md-search-result__article"><h2 class="md-search-result__title">{sub_title}</h2>"#,
            );
            if !section.text.is_empty() {
                let teaser = self.teaser(&section.text, query);
                let _ = write!(
                    html,
                    r#"<p class="md-search-result__teaser">{teaser}</p>"#
                );
            }
            html.push_str("</article></a>");
        }

        if group.hidden_sections > 0 {
            let _ = write!(
                html,
                r#"<div class="md-search-result__more">{} more results on this page</div>"#,
                group.hidden_sections
            );
        }
        html.push_str("</li>");
    }

    /// Highlighted maximal-density excerpt of a text field.
    fn teaser(&self, text: &str, query: &str) -> String {
        let snippet = extract_snippet(
            text,
            query,
            self.config.snippet_len,
            self.config.snippet_lead_in,
            self.config.snippet_tolerance,
        );
        highlight(&snippet, query)
    }
}

/// Write into the container, arming the marker only when the content
/// actually changed.
fn write_container(
    list: &dyn ResultList,
    markup: &str,
    session: &mut SearchSession,
) -> Result<(), SearchError> {
    match list.write_results(markup) {
        WriteOutcome::Changed => {
            session.self_write = true;
            Ok(())
        }
        WriteOutcome::Unchanged => Ok(()),
        WriteOutcome::Detached => Err(SearchError::RenderTargetMissing),
    }
}
