// Search debouncer - Coalesces query edits into one lookup per quiet period
use crate::application::gateway::AirQualityGateway;
use crate::domain::search::SearchCandidate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    PendingDebounce { query: String, deadline: Instant },
    InFlight { query: String },
    Settled { query: String, results: Vec<SearchCandidate> },
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_len: 2,
        }
    }
}

/// Every edit restarts the debounce timer and takes a new ticket. A search
/// settles only if its ticket is still current when the response arrives,
/// so a slow early response can never replace a later one.
#[derive(Clone)]
pub struct SearchDebouncer {
    inner: Arc<DebouncerInner>,
}

struct DebouncerInner {
    gateway: AirQualityGateway,
    settings: SearchSettings,
    state: watch::Sender<SearchState>,
    pending: Mutex<Pending>,
}

struct Pending {
    ticket: u64,
    timer: Option<JoinHandle<()>>,
    searches: JoinSet<()>,
    closed: bool,
}

impl SearchDebouncer {
    pub fn new(gateway: AirQualityGateway, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            inner: Arc::new(DebouncerInner {
                gateway,
                settings,
                state,
                pending: Mutex::new(Pending {
                    ticket: 0,
                    timer: None,
                    searches: JoinSet::new(),
                    closed: false,
                }),
            }),
        }
    }

    /// Surrounding whitespace is not part of the query.
    pub fn edit(&self, query: impl Into<String>) {
        let query = query.into().trim().to_string();
        let mut pending = self.inner.lock_pending();
        if pending.closed {
            return;
        }

        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.ticket += 1;

        if query.chars().count() < self.inner.settings.min_query_len {
            self.inner.state.send_replace(SearchState::Settled {
                query: String::new(),
                results: Vec::new(),
            });
            return;
        }

        let ticket = pending.ticket;
        let deadline = Instant::now() + self.inner.settings.debounce;
        self.inner.state.send_replace(SearchState::PendingDebounce {
            query: query.clone(),
            deadline,
        });

        let inner = Arc::clone(&self.inner);
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            DebouncerInner::issue(&inner, ticket, query);
        }));
    }

    /// Take the `index`-th settled result, resetting the search to idle.
    /// Returns `None` (and changes nothing) if there is no such result.
    pub fn select(&self, index: usize) -> Option<SearchCandidate> {
        let mut pending = self.inner.lock_pending();
        let candidate = match &*self.inner.state.borrow() {
            SearchState::Settled { results, .. } => results.get(index).cloned(),
            _ => None,
        }?;

        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.ticket += 1;
        self.inner.state.send_replace(SearchState::Idle);

        tracing::debug!(name = %candidate.display_name, "Search candidate selected");
        Some(candidate)
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Cancel the debounce timer and abort outstanding searches.
    pub fn shutdown(&self) {
        let mut pending = self.inner.lock_pending();
        if pending.closed {
            return;
        }
        pending.closed = true;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.searches.abort_all();
        self.inner.state.send_replace(SearchState::Idle);
    }
}

impl DebouncerInner {
    fn lock_pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(this: &Arc<Self>, ticket: u64, query: String) {
        let mut pending = this.lock_pending();
        if pending.closed || pending.ticket != ticket {
            return;
        }
        // Detach the timer; the search below is not cancelled by later edits
        pending.timer = None;

        this.state.send_replace(SearchState::InFlight {
            query: query.clone(),
        });
        tracing::debug!(query = %query, ticket, "Issuing search");

        while pending.searches.try_join_next().is_some() {}

        let inner = Arc::clone(this);
        pending.searches.spawn(async move {
            let outcome = inner.gateway.search_by_name(&query).await;
            inner.settle(ticket, query, outcome.data);
        });
    }

    fn settle(&self, ticket: u64, query: String, results: Vec<SearchCandidate>) {
        let pending = self.lock_pending();
        if pending.closed || pending.ticket != ticket {
            tracing::debug!(query = %query, ticket, "Discarding stale search results");
            return;
        }

        self.state.send_if_modified(|state| match state {
            SearchState::InFlight { query: current } if *current == query => {
                *state = SearchState::Settled { query, results };
                true
            }
            _ => false,
        });
    }
}
