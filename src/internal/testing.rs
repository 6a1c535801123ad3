//! Scripted [`ArticleSource`] used by unit tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::api::ArticleSource;
use crate::internal::error::FetchError;
use crate::internal::models::Article;

pub fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        author: Some(format!("{} author", title)),
        ..Default::default()
    }
}

pub fn articles(prefix: &str, n: usize) -> Vec<Article> {
    (0..n).map(|i| article(&format!("{} {}", prefix, i))).collect()
}

/// Answers queries from a fixed table and records every call. A query can be
/// gated so its response is held back until the test releases it.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<String, Result<Vec<Article>, FetchError>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, query: &str, outcome: Result<Vec<Article>, FetchError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), outcome);
        self
    }

    /// Hold responses for `query` until the returned handle is notified.
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ArticleSource for ScriptedSource {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Article>, FetchError>> + Send {
        self.calls.lock().unwrap().push(query.to_string());
        let gate = self.gates.lock().unwrap().get(query).cloned();
        let outcome = self
            .responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));

        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            outcome
        }
    }
}
