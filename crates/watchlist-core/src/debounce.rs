use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use watchlist_models::SearchResult;
use watchlist_search::MetadataSearch;

/// What a search box shows right now
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
    pub searching: bool,
}

/// Debounced search-as-you-type.
///
/// Every [`submit`](SearchSession::submit) starts a new generation and aborts
/// the pending one. A search only runs once its query has been left alone for
/// the settle delay, and its results are only shown if no newer query arrived
/// while it was in flight.
pub struct SearchSession {
    search: Arc<dyn MetadataSearch>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    view: Arc<watch::Sender<SearchView>>,
    pending: Option<JoinHandle<()>>,
}

impl SearchSession {
    pub fn new(search: Arc<dyn MetadataSearch>, delay: Duration) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            search,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            view: Arc::new(view),
            pending: None,
        }
    }

    pub fn submit(&mut self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let query = query.trim().to_string();
        if query.is_empty() {
            self.view.send_replace(SearchView::default());
            return;
        }

        self.view.send_modify(|view| {
            view.query = query.clone();
            view.searching = true;
        });

        let search = Arc::clone(&self.search);
        let latest = Arc::clone(&self.generation);
        let view = Arc::clone(&self.view);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            debug!("Searching for '{}'", query);
            let outcome = search.search_all(&query).await;

            let next = match outcome {
                Ok(results) => SearchView {
                    query,
                    results,
                    error: None,
                    searching: false,
                },
                Err(e) => {
                    warn!("Search for '{}' failed: {}", query, e);
                    SearchView {
                        query,
                        results: Vec::new(),
                        error: Some(e.to_string()),
                        searching: false,
                    }
                }
            };
            // checked under the channel lock, so a newer submit can't slip in between
            let applied = view.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *current = next;
                true
            });
            if !applied {
                debug!("Discarding stale results");
            }
        }));
    }

    pub fn current(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    /// Wait for the pending search, if any, and return the resulting view
    pub async fn settle(&mut self) -> SearchView {
        if let Some(pending) = self.pending.take() {
            // an aborted task is not an error here
            let _ = pending.await;
        }
        self.current()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use watchlist_models::{ItemId, MediaType};
    use watchlist_search::SearchError;

    #[derive(Default)]
    struct StubSearch {
        queries: Mutex<Vec<String>>,
        latency: Duration,
        fail: bool,
    }

    impl StubSearch {
        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataSearch for StubSearch {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn search_all(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            tokio::time::sleep(self.latency).await;
            if self.fail {
                return Err(SearchError::NotConfigured("no key".to_string()));
            }
            Ok(vec![SearchResult {
                id: ItemId(1),
                title: query.to_string(),
                overview: None,
                poster: None,
                release_date: None,
                rating: None,
                media_type: MediaType::Movie,
            }])
        }
    }

    fn session(stub: &Arc<StubSearch>) -> SearchSession {
        SearchSession::new(Arc::clone(stub) as Arc<dyn MetadataSearch>, Duration::from_millis(500))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_searches_once() {
        let stub = Arc::new(StubSearch::default());
        let mut session = session(&stub);

        session.submit("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.submit("al");
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.submit("alien");

        let view = session.settle().await;
        assert_eq!(stub.queries(), vec!["alien".to_string()]);
        assert_eq!(view.query, "alien");
        assert_eq!(view.results.len(), 1);
        assert!(!view.searching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_runs_before_settle_delay() {
        let stub = Arc::new(StubSearch::default());
        let mut session = session(&stub);

        session.submit("alien");
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(stub.queries().is_empty());
        assert!(session.current().searching);

        session.settle().await;
        assert_eq!(stub.queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_results_are_superseded() {
        let stub = Arc::new(StubSearch {
            latency: Duration::from_secs(1),
            ..StubSearch::default()
        });
        let mut session = session(&stub);

        session.submit("alien");
        // past the settle delay: the first search is in flight
        tokio::time::sleep(Duration::from_millis(600)).await;
        session.submit("heat");

        let view = session.settle().await;
        assert_eq!(stub.queries(), vec!["alien".to_string(), "heat".to_string()]);
        assert_eq!(view.query, "heat");
        assert_eq!(view.results[0].title, "heat");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_superseded_results_never_land_across_threads() {
        let stub = Arc::new(StubSearch::default());
        let mut session = SearchSession::new(Arc::clone(&stub) as Arc<dyn MetadataSearch>, Duration::ZERO);

        for round in 0..200 {
            let query = format!("q{round}");
            session.submit(&query);
            tokio::task::yield_now().await;

            let view = session.current();
            if !view.searching {
                assert_eq!(view.query, query);
                assert_eq!(view.results[0].title, query);
            }
        }

        let view = session.settle().await;
        assert_eq!(view.query, "q199");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_clears_immediately() {
        let stub = Arc::new(StubSearch::default());
        let mut session = session(&stub);

        session.submit("alien");
        assert_eq!(session.settle().await.results.len(), 1);

        session.submit("   ");
        assert_eq!(session.current(), SearchView::default());
        session.settle().await;
        assert_eq!(stub.queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_shown_in_view() {
        let stub = Arc::new(StubSearch {
            fail: true,
            ..StubSearch::default()
        });
        let mut session = session(&stub);

        session.submit("alien");
        let view = session.settle().await;
        assert!(view.results.is_empty());
        assert!(view.error.unwrap().contains("not configured"));
    }
}
