//! Host synchronization: wires the query input, keyboard navigation, and
//! reset control, and keeps the ranked results asserted against a host
//! widget that performs its own asynchronous writes.
//!
//! The synchronizer is a two-state machine (`unhooked` → `hooked`). Hooking
//! happens on first discovery of the search widget; the state machine never
//! unhooks on its own, only when the embedder reports that the page was
//! replaced. Widget discovery retries are bounded by a watch window so a
//! stable page is not observed forever.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::aggregate::Aggregator;
use crate::config::SearchConfig;
use crate::corpus::{self, CorpusSource};
use crate::render::{RenderSink, ResultList};
use crate::search::{QueryEngine, SearchIndex};
use crate::types::SearchSession;

/// Read access to the host page, implemented over the live document or a
/// test double. Container writes go through the [`ResultList`] supertrait.
pub trait Host: ResultList + Send + Sync + 'static {
    /// Whether both the query input and the result container exist.
    fn widget_present(&self) -> bool;

    /// Current value of the query input; `None` when the input is gone.
    fn query_value(&self) -> Option<String>;

    /// Follow the link of the result at `index` (page headers and visible
    /// sections, in rendered order). Returns `false` when out of range.
    fn activate_result(&self, index: usize) -> bool;
}

/// Keyboard events the synchronizer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
}

struct State {
    hooked: bool,
    session: SearchSession,
    index: Option<Arc<SearchIndex>>,
    /// Pending debounced render; a newer keystroke supersedes it.
    pending: Option<JoinHandle<()>>,
    /// Activatable links in the last render, for cursor clamping.
    link_count: usize,
    /// Widget discovery stops when this passes; `None` means not watching.
    hook_deadline: Option<Instant>,
}

/// Coordinates the whole pipeline against one host page.
///
/// Owns the per-session state the in-page original kept in module globals,
/// so the engine and aggregator stay testable in isolation.
pub struct Synchronizer<H: Host> {
    host: Arc<H>,
    engine: QueryEngine,
    aggregator: Aggregator,
    sink: RenderSink,
    debounce: Duration,
    hook_window: Duration,
    /// Self-handle for the tasks this synchronizer spawns.
    weak: Weak<Self>,
    state: Mutex<State>,
}

impl<H: Host> Synchronizer<H> {
    pub fn new(host: Arc<H>, config: SearchConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            host,
            engine: QueryEngine::new(&config),
            aggregator: Aggregator::new(&config),
            debounce: config.debounce,
            hook_window: config.hook_window,
            weak: weak.clone(),
            sink: RenderSink::new(config),
            state: Mutex::new(State {
                hooked: false,
                session: SearchSession::default(),
                index: None,
                pending: None,
                link_count: 0,
                hook_deadline: None,
            }),
        })
    }

    /// Begin the session: kick off the corpus load in the background and
    /// attempt the first hook. If the widget is not in the page yet, a
    /// bounded watch window keeps retrying on DOM mutations.
    pub fn start(&self, source: impl CorpusSource) {
        let Some(sync) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            match corpus::build_index(&source).await {
                Ok(index) => sync.index_ready(Arc::new(index)),
                // Soft failure: ranked search stays unavailable, the host's
                // own widget keeps working. No retry until the next load.
                Err(e) => tracing::warn!("search index unavailable: {e}"),
            }
        });

        if !self.try_hook() {
            let mut st = self.state.lock().expect("synchronizer state poisoned");
            st.hook_deadline = Some(Instant::now() + self.hook_window);
        }
    }

    /// The index finished building. Flips `ready` exactly once; a query the
    /// user typed during the load renders immediately so no input is
    /// dropped to load latency.
    pub fn index_ready(&self, index: Arc<SearchIndex>) {
        let mut st = self.state.lock().expect("synchronizer state poisoned");
        if st.session.ready {
            return;
        }
        tracing::info!("search index ready ({} documents)", index.document_count());
        st.index = Some(index);
        st.session.ready = true;
        if !st.session.last_query.trim().is_empty() {
            self.run_pipeline(&mut st);
        }
    }

    /// unhooked → hooked, once the widget exists.
    pub fn try_hook(&self) -> bool {
        let mut st = self.state.lock().expect("synchronizer state poisoned");
        if st.hooked {
            return true;
        }
        if !self.host.widget_present() {
            return false;
        }
        st.hooked = true;
        st.hook_deadline = None;
        tracing::debug!("hooked host search widget");
        true
    }

    /// An input event fired on the query input. Reads the current value,
    /// clears immediately on an empty query, otherwise schedules a
    /// debounced render. Latest wins: the previous pending render is
    /// aborted before the new timer starts.
    pub fn on_input(&self) {
        let Some(query) = self.host.query_value() else {
            return;
        };

        let mut st = self.state.lock().expect("synchronizer state poisoned");
        st.session.last_query = query.clone();
        if let Some(pending) = st.pending.take() {
            pending.abort();
        }

        if query.trim().is_empty() {
            self.sink.clear(&*self.host, &mut st.session);
            st.link_count = 0;
            st.session.cursor = -1;
            return;
        }
        if !st.session.ready {
            // The load will pick this query up via index_ready.
            return;
        }

        let Some(sync) = self.weak.upgrade() else {
            return;
        };
        let debounce = self.debounce;
        st.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let mut st = sync.state.lock().expect("synchronizer state poisoned");
            sync.run_pipeline(&mut st);
        }));
    }

    /// Keyboard navigation over the rendered results. The cursor is
    /// clamped to `[-1, last]`, no wrapping; Enter follows the cursored
    /// link.
    pub fn on_key(&self, key: Key) {
        let mut st = self.state.lock().expect("synchronizer state poisoned");
        let last = st.link_count as isize - 1;
        match key {
            Key::ArrowDown => st.session.cursor = (st.session.cursor + 1).min(last),
            Key::ArrowUp => st.session.cursor = (st.session.cursor - 1).max(-1),
            Key::Enter => {
                if st.session.cursor >= 0 {
                    self.host.activate_result(st.session.cursor as usize);
                }
            }
        }
    }

    /// The search form was reset: query state, container, count line, and
    /// cursor all go back to idle.
    pub fn on_reset(&self) {
        let mut st = self.state.lock().expect("synchronizer state poisoned");
        if let Some(pending) = st.pending.take() {
            pending.abort();
        }
        st.session.last_query.clear();
        st.session.cursor = -1;
        st.link_count = 0;
        self.sink.clear(&*self.host, &mut st.session);
    }

    /// The result container changed. A write armed by the render sink is
    /// our own and consumes the marker; anything else is the host's legacy
    /// widget overwriting the ranked results, which triggers a re-render.
    pub fn on_container_mutated(&self) {
        let mut st = self.state.lock().expect("synchronizer state poisoned");
        if st.session.self_write {
            st.session.self_write = false;
            return;
        }
        if st.session.ready && !st.session.last_query.trim().is_empty() {
            tracing::debug!("foreign write to result container, re-asserting ranked results");
            self.run_pipeline(&mut st);
        }
    }

    /// The host replaced its page structure (instant-navigation style).
    /// Drop the hook and view state, keep the index, and re-attempt
    /// hooking within a fresh watch window.
    pub fn on_page_replaced(&self) {
        {
            let mut st = self.state.lock().expect("synchronizer state poisoned");
            st.hooked = false;
            st.link_count = 0;
            st.session.last_query.clear();
            st.session.cursor = -1;
            st.session.self_write = false;
            if let Some(pending) = st.pending.take() {
                pending.abort();
            }
        }
        if !self.try_hook() {
            let mut st = self.state.lock().expect("synchronizer state poisoned");
            st.hook_deadline = Some(Instant::now() + self.hook_window);
        }
    }

    /// A page-level DOM mutation. Only relevant while unhooked and inside
    /// the watch window; once the window passes, watching stops until the
    /// next page replacement.
    pub fn on_dom_mutated(&self) {
        {
            let mut st = self.state.lock().expect("synchronizer state poisoned");
            if st.hooked {
                return;
            }
            match st.hook_deadline {
                Some(deadline) if Instant::now() <= deadline => {}
                Some(_) => {
                    st.hook_deadline = None;
                    tracing::debug!("hook watch window elapsed");
                    return;
                }
                None => return,
            }
        }
        self.try_hook();
    }

    /// Whether the widget is currently hooked.
    pub fn hooked(&self) -> bool {
        self.state.lock().expect("synchronizer state poisoned").hooked
    }

    /// Run search → aggregate → render for the current query.
    fn run_pipeline(&self, st: &mut State) {
        let query = st.session.last_query.clone();
        let Some(hits) = self.engine.search(st.index.as_ref(), &query) else {
            return;
        };
        let groups = self.aggregator.aggregate(&hits);
        match self
            .sink
            .render(&groups, hits.len(), &query, &*self.host, &mut st.session)
        {
            Ok(outcome) => {
                st.link_count = outcome.link_count;
                st.session.cursor = -1;
            }
            Err(e) => tracing::debug!("render aborted: {e}"),
        }
    }
}
