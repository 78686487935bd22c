//! Tests for the controller module

use super::*;
use crate::error::{Error, Result};
use crate::fetch::PagedListFetcher;
use crate::filter::{FilterCriteria, SortOrder};
use crate::pagination::{ListEvent, ListItem, LoadPhase, LoadStatus, PageResponse};
use crate::scroll::ScrollMetrics;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: u32,
    name: String,
    category: String,
}

impl ListItem for Row {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

/// In-memory list API with per-category latency and one-shot failures
#[derive(Debug, Default)]
struct MemoryFetcher {
    rows: Vec<Row>,
    latency: HashMap<String, Duration>,
    fail_pages: Mutex<HashSet<u32>>,
    calls: Mutex<Vec<(FilterCriteria, u32)>>,
}

impl MemoryFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn with_rows(mut self, category: &str, count: u32) -> Self {
        let start = self.rows.len() as u32;
        self.rows.extend((start..start + count).map(|id| Row {
            id,
            name: format!("{category} strategy {id}"),
            category: category.to_string(),
        }));
        self
    }

    fn with_latency(mut self, category: &str, latency: Duration) -> Self {
        self.latency.insert(category.to_string(), latency);
        self
    }

    fn fail_once(&self, page: u32) {
        self.fail_pages.lock().unwrap().insert(page);
    }

    fn calls(&self) -> Vec<(FilterCriteria, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PagedListFetcher<Row> for MemoryFetcher {
    async fn fetch(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<Row>> {
        self.calls.lock().unwrap().push((criteria.clone(), page));
        let latency = self
            .latency
            .get(&criteria.category)
            .copied()
            .unwrap_or(Duration::from_millis(20));
        tokio::time::sleep(latency).await;

        if self.fail_pages.lock().unwrap().remove(&page) {
            return Err(Error::http_status(503, "unavailable"));
        }

        let matching: Vec<Row> = self
            .rows
            .iter()
            .filter(|r| criteria.category.is_empty() || r.category == criteria.category)
            .filter(|r| r.name.contains(&criteria.search_term))
            .cloned()
            .collect();
        let start = ((page - 1) * page_size) as usize;
        let items = matching
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(PageResponse::new(items, matching.len() as u64))
    }
}

fn settings() -> ListSettings {
    ListSettings::default()
        .with_page_size(20)
        .with_search_debounce(Duration::from_millis(400))
}

fn spawn(fetcher: &Arc<MemoryFetcher>) -> ListHandle<Row> {
    ListController::spawn(Arc::clone(fetcher) as Arc<dyn PagedListFetcher<Row>>, settings())
}

fn near_bottom() -> ScrollMetrics {
    ScrollMetrics::new(1000.0, 800.0, 2000.0)
}

#[tokio::test(start_paused = true)]
async fn test_loads_first_page_on_spawn() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);

    assert_eq!(handle.view().page.status, LoadStatus::LoadingFirst);

    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 20);
    assert_eq!(view.page.page, 1);
    assert_eq!(view.page.total, Some(45));
    assert!(view.page.has_more);
    assert_eq!(view.page.status, LoadStatus::Idle);
    assert_eq!(fetcher.calls(), vec![(FilterCriteria::default(), 1)]);
}

#[tokio::test(start_paused = true)]
async fn test_scrolls_to_the_end() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.scrolled(near_bottom()).unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 40);
    assert_eq!(view.page.page, 2);

    handle.load_next_page().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 45);
    assert_eq!(view.page.status, LoadStatus::End);
    assert!(!view.page.has_more);
    assert!(view.end_marker);

    handle.scrolled(near_bottom()).unwrap();
    handle.load_next_page().unwrap();
    handle.wait_until_settled().await.unwrap();
    assert_eq!(fetcher.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_at_end_publishes_nothing() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 5));
    let mut handle = spawn(&fetcher);
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.page.status, LoadStatus::End);
    handle.changed().await.unwrap();

    for _ in 0..10 {
        handle.scrolled(near_bottom()).unwrap();
        let next = tokio::time::timeout(Duration::from_millis(5), handle.changed()).await;
        assert!(next.is_err(), "no-op scroll published a view");
    }
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_while_loading_more_publishes_nothing() {
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_rows("trend", 45)
            .with_latency("", Duration::from_millis(100)),
    );
    let mut handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();
    handle.changed().await.unwrap();

    handle.scrolled(near_bottom()).unwrap();
    let view = handle.changed().await.unwrap();
    assert_eq!(view.page.status, LoadStatus::LoadingMore);

    handle.scrolled(near_bottom()).unwrap();
    let next = tokio::time::timeout(Duration::from_millis(5), handle.changed()).await;
    assert!(next.is_err());

    let view = handle.changed().await.unwrap();
    assert_eq!(view.items().len(), 40);
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_far_from_bottom_does_not_load() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle
        .scrolled(ScrollMetrics::new(0.0, 800.0, 2000.0))
        .unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 20);
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_scroll_events_fetch_once() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    for _ in 0..5 {
        handle.scrolled(near_bottom()).unwrap();
    }
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 40);
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_typing_debounces_into_one_fetch() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("grid", 5).with_rows("trend", 5));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    for term in ["g", "gr", "gri", "grid"] {
        handle.set_search_term(term).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(handle.view().search_input, "grid");
    assert!(handle.view().search_pending);
    assert_eq!(fetcher.calls().len(), 1);

    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.criteria.search_term, "grid");
    assert_eq!(view.items().len(), 5);
    assert!(view.items().iter().all(|r| r.category == "grid"));

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0.search_term, "grid");
}

#[tokio::test(start_paused = true)]
async fn test_flush_search_commits_immediately() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("grid", 5).with_rows("trend", 5));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.set_search_term("trend").unwrap();
    handle.flush_search().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.criteria.search_term, "trend");
    assert_eq!(view.items().len(), 5);
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_selection_folds_in_pending_search() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("grid", 5).with_rows("trend", 5));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.set_search_term("strategy 7").unwrap();
    handle.set_category("trend").unwrap();
    let view = handle.wait_until_settled().await.unwrap();

    assert_eq!(
        view.criteria,
        FilterCriteria::default()
            .with_search_term("strategy 7")
            .with_category("trend")
    );
    assert_eq!(view.items().len(), 1);
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_discarded() {
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_rows("slow", 3)
            .with_rows("fast", 4)
            .with_latency("slow", Duration::from_millis(500))
            .with_latency("fast", Duration::from_millis(10)),
    );
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.set_category("slow").unwrap();
    handle.set_category("fast").unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.criteria.category, "fast");
    assert_eq!(view.items().len(), 4);

    // Let the slow response arrive
    tokio::time::sleep(Duration::from_secs(1)).await;
    let view = handle.view();
    assert_eq!(view.criteria.category, "fast");
    assert_eq!(view.items().len(), 4);
    assert!(view.items().iter().all(|r| r.category == "fast"));
    assert_eq!(view.page.generation, 3);
}

#[tokio::test(start_paused = true)]
async fn test_sort_change_during_load_more_resets() {
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_rows("trend", 45)
            .with_latency("", Duration::from_millis(200)),
    );
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.load_next_page().unwrap();
    handle.set_sort("name", SortOrder::Asc).unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.page.page, 1);
    assert_eq!(view.items().len(), 20);
    assert_eq!(view.criteria.sort_order, SortOrder::Asc);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.view().items().len(), 20);
}

#[tokio::test(start_paused = true)]
async fn test_load_more_failure_keeps_items_and_retries() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    fetcher.fail_once(2);
    handle.load_next_page().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.page.status, LoadStatus::Idle);
    assert_eq!(view.items().len(), 20);
    let error = view.page.last_error.unwrap();
    assert_eq!(error.phase, LoadPhase::NextPage);
    assert!(error.retryable);

    handle.retry().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 40);
    assert!(view.page.last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_load_more_notice_can_be_dismissed() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    fetcher.fail_once(2);
    handle.load_next_page().unwrap();
    handle.wait_until_settled().await.unwrap();

    handle.dismiss_error().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert!(view.page.last_error.is_none());
    assert_eq!(view.items().len(), 20);
}

#[tokio::test(start_paused = true)]
async fn test_first_page_failure_blocks_until_retry() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 5));
    fetcher.fail_once(1);
    let handle = spawn(&fetcher);

    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.page.status, LoadStatus::Error);
    assert!(view.items().is_empty());
    assert_eq!(view.page.last_error.unwrap().phase, LoadPhase::FirstPage);

    handle.retry().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.page.status, LoadStatus::End);
    assert_eq!(view.items().len(), 5);
    assert_eq!(view.page.generation, 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_is_not_an_end_marker() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 5));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.set_category("missing").unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert!(view.is_empty_result());
    assert!(!view.end_marker);
    assert!(view.page.last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_clear_filters_restores_defaults() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("grid", 5).with_rows("trend", 5));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();

    handle.set_category("grid").unwrap();
    handle.set_search_term("typing").unwrap();
    handle.clear_filters().unwrap();
    let view = handle.wait_until_settled().await.unwrap();

    assert_eq!(view.criteria, FilterCriteria::default());
    assert_eq!(view.search_input, "");
    assert_eq!(view.items().len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_reset_reloads_first_page() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 45));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();
    handle.load_next_page().unwrap();
    handle.wait_until_settled().await.unwrap();

    handle.reset().unwrap();
    let view = handle.wait_until_settled().await.unwrap();
    assert_eq!(view.page.page, 1);
    assert_eq!(view.items().len(), 20);
    assert_eq!(view.page.generation, 2);
}

#[tokio::test(start_paused = true)]
async fn test_events_are_published() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("grid", 5));
    let handle = spawn(&fetcher);
    handle.wait_until_settled().await.unwrap();
    let mut events = handle.subscribe();

    handle.set_category("grid").unwrap();
    handle.wait_until_settled().await.unwrap();

    let first = events.recv().await.unwrap();
    assert_eq!(
        first,
        ListEvent::Reset {
            generation: 2,
            criteria: FilterCriteria::default().with_category("grid"),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_changed_reports_new_views() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 5));
    let mut handle = spawn(&fetcher);

    let view = handle.changed().await.unwrap();
    assert!(view.page.total.is_some() || view.page.status.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_dispose_closes_handle() {
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_rows("trend", 5)
            .with_latency("", Duration::from_millis(300)),
    );
    let handle = spawn(&fetcher);
    let other = handle.clone();

    handle.dispose();
    handle.dispose();
    assert!(handle.is_closed());
    assert!(other.is_closed());
    assert!(matches!(other.set_category("trend"), Err(Error::ListClosed)));
    assert!(matches!(handle.retry(), Err(Error::ListClosed)));
    assert!(matches!(
        handle.wait_until_settled().await,
        Err(Error::ListClosed)
    ));

    // The in-flight first page never lands
    tokio::time::sleep(Duration::from_secs(1)).await;
    let view = handle.view();
    assert!(view.items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clones_share_one_controller() {
    let fetcher = Arc::new(MemoryFetcher::new().with_rows("trend", 5));
    let handle = spawn(&fetcher);
    let mut watcher = handle.clone();
    drop(handle);

    // Clones keep the controller alive
    assert!(!watcher.is_closed());
    let view = watcher.wait_until_settled().await.unwrap();
    assert_eq!(view.items().len(), 5);
    watcher.dispose();
    assert!(watcher.changed().await.is_err() || watcher.view().closed);
}
