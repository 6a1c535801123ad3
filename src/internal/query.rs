//! Query text ownership and fetch scheduling.
//!
//! Every call to [`QueryController::set_query`] supersedes whatever fetch was
//! in flight: its cancellation token is fired and the generation counter is
//! bumped, so even a completion that slipped into the channel before the
//! cancel landed is recognised as stale and dropped by the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::api::ArticleSource;
use crate::config::SearchConfig;
use crate::internal::error::FetchError;
use crate::internal::models::Article;

/// Result of a fetch task, tagged with the generation that started it.
#[derive(Debug)]
pub struct FetchCompleted {
    pub generation: u64,
    pub query: String,
    pub outcome: Result<Vec<Article>, FetchError>,
}

/// What a query change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Too short to search; results should be cleared.
    Cleared,
    /// A fetch was scheduled under this generation.
    Scheduled { generation: u64 },
}

pub struct QueryController<S: ArticleSource> {
    source: Arc<S>,
    config: SearchConfig,
    timeout: Duration,
    query: String,
    generation: u64,
    in_flight: Option<CancellationToken>,
    completed_tx: UnboundedSender<FetchCompleted>,
}

impl<S: ArticleSource> QueryController<S> {
    pub fn new(
        source: Arc<S>,
        config: SearchConfig,
        timeout: Duration,
        completed_tx: UnboundedSender<FetchCompleted>,
    ) -> Self {
        Self {
            source,
            config: config.clamped(),
            timeout,
            query: String::new(),
            generation: 0,
            in_flight: None,
            completed_tx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_outstanding(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_qualifying(&self, text: &str) -> bool {
        text.chars().count() >= self.config.min_query_len
    }

    /// Replace the query text. Cancels any outstanding fetch and, for a
    /// qualifying query, spawns a new one. Must run inside a Tokio runtime
    /// when the query qualifies.
    pub fn set_query(&mut self, text: impl Into<String>) -> QueryOutcome {
        self.query = text.into();
        self.cancel_in_flight();
        self.generation += 1;

        if !self.is_qualifying(&self.query) {
            return QueryOutcome::Cleared;
        }

        let generation = self.generation;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.spawn_fetch(generation, token);
        tracing::info!(generation, query = %self.query, "search scheduled");

        QueryOutcome::Scheduled { generation }
    }

    /// Accept a completion if it belongs to the current generation.
    /// Stale completions return `false` and leave the controller untouched.
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.in_flight.is_none() {
            return false;
        }
        self.in_flight = None;
        true
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            tracing::debug!(generation = self.generation, "cancelling superseded search");
            token.cancel();
        }
    }

    fn spawn_fetch(&self, generation: u64, token: CancellationToken) {
        let source = Arc::clone(&self.source);
        let tx = self.completed_tx.clone();
        let query = self.query.clone();
        let debounce = self.config.debounce();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let request_query = query.clone();
            let fetch = async move {
                if !debounce.is_zero() {
                    tokio::time::sleep(debounce).await;
                }
                match tokio::time::timeout(timeout, source.search(&request_query)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(FetchError::Timeout(timeout)),
                }
            };

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(generation, "search task cancelled");
                }
                outcome = fetch => {
                    let _ = tx.send(FetchCompleted { generation, query, outcome });
                }
            }
        });
    }
}

impl<S: ArticleSource> Drop for QueryController<S> {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
