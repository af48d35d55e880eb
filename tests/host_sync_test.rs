//! Host synchronizer behavior: debouncing, pending queries, foreign-write
//! re-assertion, keyboard navigation, and the bounded re-hook window.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use assert2::check;
use common::{FailingSource, MemSource, MockHost, sample_corpus};
use sitesearch::corpus::build_index;
use sitesearch::{Key, SearchConfig, SearchIndex, Synchronizer};

/// Hooked synchronizer with a ready index over the sample corpus.
async fn ready_sync() -> (Arc<MockHost>, Arc<Synchronizer<MockHost>>) {
    let host = Arc::new(MockHost::with_widget());
    let sync = Synchronizer::new(Arc::clone(&host), SearchConfig::default());
    check!(sync.try_hook());

    let index: SearchIndex = build_index(&MemSource(sample_corpus())).await.unwrap();
    sync.index_ready(Arc::new(index));
    (host, sync)
}

/// Let pending debounce timers fire under paused time.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test(start_paused = true)]
async fn debounce_renders_only_the_settled_query() {
    let (host, sync) = ready_sync().await;

    host.set_query("gard");
    sync.on_input();
    // Before the debounce interval nothing is rendered.
    tokio::time::sleep(Duration::from_millis(50)).await;
    check!(host.results().is_empty());

    // A newer keystroke supersedes the pending render.
    host.set_query("caching");
    sync.on_input();
    settle().await;

    let markup = host.results();
    check!(markup.contains("Intro to <mark>Caching</mark>"));
    check!(!markup.contains("Gardening"));
}

#[tokio::test(start_paused = true)]
async fn query_typed_before_ready_renders_on_index_ready() {
    let host = Arc::new(MockHost::with_widget());
    let sync = Synchronizer::new(Arc::clone(&host), SearchConfig::default());
    sync.try_hook();

    host.set_query("caching");
    sync.on_input();
    settle().await;
    check!(host.results().is_empty(), "no index, no render");

    let index = build_index(&MemSource(sample_corpus())).await.unwrap();
    sync.index_ready(Arc::new(index));
    // Render happens inside index_ready, no further input needed.
    check!(host.results().contains("Caching"));
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_returns_to_idle() {
    let (host, sync) = ready_sync().await;

    host.set_query("caching");
    sync.on_input();
    settle().await;
    check!(!host.results().is_empty());
    check!(!host.meta().is_empty());

    host.set_query("");
    sync.on_input();
    // Idle state: container and count line empty, immediately.
    check!(host.results().is_empty());
    check!(host.meta().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_match_query_shows_explicit_no_results() {
    let (host, sync) = ready_sync().await;

    host.set_query("zzzzzz");
    sync.on_input();
    settle().await;
    check!(host.results().is_empty());
    check!(host.meta() == "No matching documents");
}

#[tokio::test(start_paused = true)]
async fn foreign_container_write_is_overwritten() {
    let (host, sync) = ready_sync().await;

    host.set_query("caching");
    sync.on_input();
    settle().await;
    let ranked = host.results();
    check!(!ranked.is_empty());

    // Our own write consumes the marker.
    sync.on_container_mutated();
    check!(host.results() == ranked);

    // The legacy widget clobbers the container; no marker is armed, so the
    // synchronizer re-asserts the ranked results.
    host.foreign_write("<li>legacy lexical results</li>");
    sync.on_container_mutated();
    check!(host.results() == ranked);
    check!(!host.results().contains("legacy"));
}

#[tokio::test(start_paused = true)]
async fn foreign_write_after_a_no_op_render_is_still_overwritten() {
    let (host, sync) = ready_sync().await;

    // Zero-match query: the container is already empty, so the render
    // changes nothing, no mutation fires, and no marker may be left armed.
    host.set_query("zzzzzz");
    sync.on_input();
    settle().await;
    check!(host.results().is_empty());

    // The legacy widget writes its own list; with no stale marker to
    // absorb the event, the synchronizer re-asserts the ranked state.
    host.foreign_write("<li>legacy lexical results</li>");
    sync.on_container_mutated();
    check!(!host.results().contains("legacy"));
}

#[tokio::test(start_paused = true)]
async fn own_writes_do_not_feed_back() {
    let (host, sync) = ready_sync().await;

    host.set_query("caching");
    sync.on_input();
    settle().await;

    // One marker per render cycle: handling our own mutation events can
    // only re-assert the same markup, never diverge or recurse.
    sync.on_container_mutated();
    let after_first = host.results();
    sync.on_container_mutated();
    check!(host.results() == after_first);
}

#[tokio::test(start_paused = true)]
async fn keyboard_cursor_is_clamped_and_enter_activates() {
    let (host, sync) = ready_sync().await;

    host.set_query("caching");
    sync.on_input();
    settle().await;

    // Enter with no cursor does nothing.
    sync.on_key(Key::Enter);
    check!(host.activations.lock().unwrap().is_empty());

    for _ in 0..20 {
        sync.on_key(Key::ArrowDown);
    }
    sync.on_key(Key::Enter);
    let last = *host.activations.lock().unwrap().last().unwrap();
    check!(last > 0, "cursor clamped at the last link, not wrapped");

    for _ in 0..40 {
        sync.on_key(Key::ArrowUp);
    }
    sync.on_key(Key::Enter);
    // Cursor clamps at -1; Enter adds no activation.
    check!(host.activations.lock().unwrap().len() == 1);
}

#[tokio::test(start_paused = true)]
async fn reset_clears_query_state_and_container() {
    let (host, sync) = ready_sync().await;

    host.set_query("caching");
    sync.on_input();
    settle().await;
    check!(!host.results().is_empty());

    sync.on_reset();
    check!(host.results().is_empty());
    check!(host.meta().is_empty());

    // A later mutation event must not resurrect the old query.
    sync.on_container_mutated();
    sync.on_container_mutated();
    check!(host.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sequential_load_failures_leave_search_disabled() {
    let host = Arc::new(MockHost::with_widget());
    let sync = Synchronizer::new(Arc::clone(&host), SearchConfig::default());

    sync.start(FailingSource);
    settle().await;
    sync.start(FailingSource);
    settle().await;

    // Still usable as a page: input events are no-ops, nothing panics.
    host.set_query("caching");
    sync.on_input();
    settle().await;
    check!(host.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn hooking_waits_for_the_widget_within_the_window() {
    let host = Arc::new(MockHost::default());
    let sync = Synchronizer::new(Arc::clone(&host), SearchConfig::default());

    sync.start(MemSource(sample_corpus()));
    check!(!sync.hooked());

    // Widget appears late; a DOM mutation inside the window hooks it.
    tokio::time::sleep(Duration::from_secs(2)).await;
    sync.on_dom_mutated();
    check!(!sync.hooked());

    host.present.store(true, Ordering::SeqCst);
    sync.on_dom_mutated();
    check!(sync.hooked());
}

#[tokio::test(start_paused = true)]
async fn hook_watching_stops_after_the_window() {
    let host = Arc::new(MockHost::default());
    let sync = Synchronizer::new(Arc::clone(&host), SearchConfig::default());

    sync.start(MemSource(sample_corpus()));
    tokio::time::sleep(Duration::from_secs(6)).await;

    // Window elapsed: even with the widget present, mutations no longer
    // trigger hooking.
    host.present.store(true, Ordering::SeqCst);
    sync.on_dom_mutated();
    sync.on_dom_mutated();
    check!(!sync.hooked());

    // An explicit page replacement starts a fresh attempt.
    sync.on_page_replaced();
    check!(sync.hooked());
}

#[tokio::test(start_paused = true)]
async fn page_replacement_rehooks_and_keeps_the_index() {
    let (host, sync) = ready_sync().await;

    host.set_query("caching");
    sync.on_input();
    settle().await;
    check!(!host.results().is_empty());

    sync.on_page_replaced();
    check!(sync.hooked());

    // The index survived the navigation: a new query renders without a
    // second corpus load.
    host.set_query("gardening");
    sync.on_input();
    settle().await;
    check!(host.results().contains("Gardening"));
}
