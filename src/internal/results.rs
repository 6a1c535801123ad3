use strum_macros::Display;

use super::error::FetchError;
use super::models::Article;

/// Outcome of the latest search. Exactly one variant is authoritative, so a
/// new error can never be displayed next to stale results.
#[derive(Debug, Clone, PartialEq, Default, Display)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready(Vec<Article>),
    Failed(String),
}

/// Last fetched result list together with its loading/error status.
#[derive(Debug, Clone)]
pub struct ResultStore {
    status: SearchStatus,
    max_results: usize,
}

impl ResultStore {
    pub fn new(max_results: usize) -> Self {
        Self {
            status: SearchStatus::Idle,
            max_results,
        }
    }

    /// Drop results and error without touching the network.
    pub fn clear(&mut self) {
        self.status = SearchStatus::Idle;
    }

    pub fn begin_loading(&mut self) {
        self.status = SearchStatus::Loading;
    }

    pub fn finish(&mut self, outcome: Result<Vec<Article>, FetchError>) {
        self.status = match outcome {
            Ok(mut articles) => {
                articles.truncate(self.max_results);
                SearchStatus::Ready(articles)
            }
            Err(e) => SearchStatus::Failed(e.to_string()),
        };
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SearchStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Current results; empty unless the last search succeeded.
    pub fn articles(&self) -> &[Article] {
        match &self.status {
            SearchStatus::Ready(articles) => articles,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| Article {
                title: format!("t{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_loading_hides_previous_results() {
        let mut store = ResultStore::new(10);
        store.finish(Ok(articles(3)));
        assert_eq!(store.articles().len(), 3);

        store.begin_loading();
        assert!(store.is_loading());
        assert!(store.articles().is_empty());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_success_keeps_first_results_in_order() {
        let mut store = ResultStore::new(10);
        store.finish(Ok(articles(12)));

        let titles: Vec<&str> = store.articles().iter().map(|a| a.title.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("t{}", i)).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_error_replaces_results() {
        let mut store = ResultStore::new(10);
        store.finish(Ok(articles(2)));
        store.finish(Err(FetchError::Status(500)));

        assert!(store.articles().is_empty());
        assert!(!store.is_loading());
        assert_eq!(
            store.error(),
            Some("An error occurred. Unable to fetch data.")
        );
    }

    #[test]
    fn test_clear_resets_to_idle() {
        let mut store = ResultStore::new(10);
        store.finish(Err(FetchError::Parse("bad".to_string())));
        store.clear();
        assert_eq!(store.status(), &SearchStatus::Idle);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_status_display_names_variant() {
        let mut store = ResultStore::new(10);
        assert_eq!(store.status().to_string(), "Idle");
        store.begin_loading();
        assert_eq!(store.status().to_string(), "Loading");
        store.finish(Ok(articles(2)));
        assert_eq!(store.status().to_string(), "Ready");
    }
}
