//! Debounced search input.

use super::Store;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSearch {
    query: String,
    deadline: Instant,
}

/// A single cancellable search timer.
///
/// Scheduling replaces the previous pending query, so only the last input of
/// a burst fires once the quiet period has elapsed.
#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    pending: Option<PendingSearch>,
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending query with `query`, due at `now + delay`.
    pub fn schedule(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some(PendingSearch {
            query: query.into(),
            deadline: now + self.delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending query becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Take the pending query if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.deadline <= now);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.query)
    }
}

impl Store {
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.set_search_query_at(query, Instant::now());
    }

    /// Update the search box text as of `now`.
    ///
    /// The local list is re-filtered immediately; the server query waits for
    /// [`Store::tick_at`]. A cleared box refetches the plain view right away.
    pub fn set_search_query_at(&mut self, query: impl Into<String>, now: Instant) {
        let query = query.into();
        if self.search_query == query {
            return;
        }
        self.search_query = query;
        self.refresh_visible();

        let trimmed = self.search_query.trim().to_string();
        if trimmed.is_empty() {
            self.search.cancel();
            if self.search_last_sent.as_deref() != Some("") {
                self.fetch_snippets();
            }
            return;
        }
        self.search.schedule(trimmed, now);
    }

    /// Fire the pending search if it is due; returns `true` when a fetch was sent.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let Some(query) = self.search.poll(now) else {
            return false;
        };
        if self.search_last_sent.as_deref() == Some(query.as_str()) {
            debug!("search '{}' already sent; skipping", query);
            return false;
        }
        self.fetch_snippets();
        true
    }

    /// When the UI should next call [`Store::tick`].
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }
}
