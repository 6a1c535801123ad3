use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::api::ArticleSource;
use crate::config::AppConfig;
use crate::internal::error::ValidationError;
use crate::internal::events::{DEFAULT_TITLE, EventBus, SessionEvent, Subscription, SubscriptionId};
use crate::internal::favorites::FavoritesStore;
use crate::internal::models::Article;
use crate::internal::query::{FetchCompleted, QueryController, QueryOutcome};
use crate::internal::results::ResultStore;
use crate::internal::selection::Selection;
use crate::internal::summary::{Summary, summarize};

/// The search/selection/favorites state machine.
///
/// Single owner, single task: the presentation layer calls the mutating
/// methods directly and feeds fetch completions back in through
/// [`SearchSession::handle_completed`].
pub struct SearchSession<S: ArticleSource> {
    query: QueryController<S>,
    results: ResultStore,
    selection: Selection,
    favorites: FavoritesStore,
    events: EventBus,
    completed_rx: UnboundedReceiver<FetchCompleted>,
}

impl<S: ArticleSource> SearchSession<S> {
    pub fn new(source: S, config: &AppConfig, favorites: FavoritesStore) -> Self {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let search = config.search.clone().clamped();
        let results = ResultStore::new(search.max_results);
        let query = QueryController::new(Arc::new(source), search, config.api.timeout(), completed_tx);

        Self {
            query,
            results,
            selection: Selection::default(),
            favorites,
            events: EventBus::new(),
            completed_rx,
        }
    }

    pub fn query(&self) -> &str {
        self.query.query()
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn summary(&self) -> Summary {
        summarize(self.favorites.items())
    }

    pub fn has_outstanding_fetch(&self) -> bool {
        self.query.has_outstanding()
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.events.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Update the query. Short queries clear results; qualifying ones close
    /// the detail view and start loading.
    pub fn set_query(&mut self, text: impl Into<String>) {
        match self.query.set_query(text) {
            QueryOutcome::Cleared => self.results.clear(),
            QueryOutcome::Scheduled { .. } => {
                self.close();
                self.results.begin_loading();
            }
        }
        self.events.emit(SessionEvent::SearchStatusChanged);
    }

    /// Wait for the next fetch task to finish. Pair with [`Self::handle_completed`].
    pub async fn next_completion(&mut self) -> Option<FetchCompleted> {
        self.completed_rx.recv().await
    }

    /// Apply a finished fetch. Returns `false` when it was superseded and dropped.
    pub fn handle_completed(&mut self, completed: FetchCompleted) -> bool {
        if !self.query.complete(completed.generation) {
            tracing::debug!(
                generation = completed.generation,
                query = %completed.query,
                "discarding superseded search result"
            );
            return false;
        }

        if let Err(e) = &completed.outcome {
            tracing::warn!(query = %completed.query, "search failed: {}", e);
        }
        self.results.finish(completed.outcome);
        tracing::debug!(query = %completed.query, status = %self.results.status(), "search settled");
        self.events.emit(SessionEvent::SearchStatusChanged);
        true
    }

    /// Drain completions until no fetch is outstanding.
    pub async fn settle(&mut self) {
        while self.query.has_outstanding() {
            match self.completed_rx.recv().await {
                Some(completed) => {
                    self.handle_completed(completed);
                }
                None => break,
            }
        }
    }

    pub fn select(&mut self, article: &Article) {
        self.selection.select(article);
        self.emit_title();
    }

    pub fn close(&mut self) {
        if self.selection.close() {
            self.emit_title();
        }
    }

    /// Rate and keep `article`. The detail view closes on success.
    pub fn add_favorite(&mut self, article: &Article, rating: u8) -> Result<(), ValidationError> {
        self.favorites.add(article, rating)?;
        self.events.emit(SessionEvent::FavoritesChanged {
            count: self.favorites.len(),
        });
        self.close();
        Ok(())
    }

    pub fn remove_favorite(&mut self, title: &str) -> usize {
        let removed = self.favorites.remove(title);
        self.events.emit(SessionEvent::FavoritesChanged {
            count: self.favorites.len(),
        });
        removed
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorites.is_favorite(title)
    }

    pub fn rating_of(&self, title: &str) -> Option<u8> {
        self.favorites.rating_of(title)
    }

    /// "Activate search" key: empty the query and ask for input focus.
    pub fn activate_search(&mut self) {
        self.set_query("");
        self.events.emit(SessionEvent::FocusSearch);
    }

    /// "Cancel" key: close the detail view.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn emit_title(&mut self) {
        let title = match self.selection.title() {
            Some(title) => format!("Article | {}", title),
            None => DEFAULT_TITLE.to_string(),
        };
        self.events.emit(SessionEvent::DocumentTitle(title));
    }
}
