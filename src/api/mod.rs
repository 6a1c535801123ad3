use std::future::Future;

use reqwest::Client;

use crate::config::ApiConfig;
use crate::internal::error::FetchError;
use crate::internal::models::{Article, SearchResponse};

/// Anything that can answer a keyword search with a list of articles.
///
/// The session only ever talks to this trait, so tests can swap the HTTP
/// client for a scripted source.
pub trait ArticleSource: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Article>, FetchError>> + Send;
}

/// HTTP client for the news search endpoint.
///
/// Holds the base URL and API key it was constructed with; nothing is read
/// from globals at request time.
#[derive(Clone)]
pub struct NewsApiService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiService {
    #[tracing::instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: &ApiConfig) -> Self {
        // Connect timeout only; the overall deadline is enforced by the query controller.
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn search_url(&self) -> String {
        match self.base_url.ends_with('/') {
            true => format!("{}everything", self.base_url),
            false => format!("{}/everything", self.base_url),
        }
    }

    /// Run one search. Articles come back in API order, untruncated.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_articles(&self, query: &str) -> Result<Vec<Article>, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        let url = self.search_url();

        let resp = self
            .client
            .get(&url)
            .query(&[("q", query), ("apiKey", api_key)])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "search request returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(count = parsed.articles.len(), "search request succeeded");
        Ok(parsed.articles)
    }
}

impl ArticleSource for NewsApiService {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Article>, FetchError>> + Send {
        self.fetch_articles(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn service_for(server: &mockito::ServerGuard) -> NewsApiService {
        NewsApiService::new(&ApiConfig {
            base_url: format!("{}/v2/", server.url()),
            api_key: Some("test-key".to_string()),
            ..ApiConfig::default()
        })
    }

    fn articles_json(count: usize) -> String {
        let articles: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"title": "Article {}", "author": "Author {}"}}"#, i, i))
            .collect();
        format!(
            r#"{{"status": "ok", "totalResults": {}, "articles": [{}]}}"#,
            count,
            articles.join(",")
        )
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "bitcoin".into()),
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(articles_json(12))
            .create_async()
            .await;

        let service = service_for(&server);
        let articles = service.fetch_articles("bitcoin").await.unwrap();

        mock.assert_async().await;
        assert_eq!(articles.len(), 12);
        for (i, article) in articles.iter().enumerate() {
            assert_eq!(article.title, format!("Article {}", i));
        }
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_generic() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"status": "error", "code": "rateLimited"}"#)
            .create_async()
            .await;

        let service = service_for(&server);
        let err = service.fetch_articles("rust").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err, FetchError::Status(429));
        assert_eq!(err.to_string(), "An error occurred. Unable to fetch data.");
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("invalid json")
            .create_async()
            .await;

        let service = service_for(&server);
        let err = service.fetch_articles("rust").await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_missing_articles_field_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let service = service_for(&server);
        let err = service.fetch_articles("rust").await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_without_api_key_skips_network() {
        let service = NewsApiService::new(&ApiConfig {
            base_url: "http://localhost:1/".to_string(),
            api_key: None,
            ..ApiConfig::default()
        });
        let err = service.fetch_articles("rust").await.unwrap_err();
        assert_eq!(err, FetchError::MissingApiKey);
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        let service = NewsApiService::new(&ApiConfig {
            base_url: "http://localhost:1/".to_string(),
            api_key: Some("key".to_string()),
            ..ApiConfig::default()
        });
        let err = service.fetch_articles("rust").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn test_search_url_joins_base() {
        let with_slash = NewsApiService::new(&ApiConfig::default());
        assert_eq!(with_slash.search_url(), "https://newsapi.org/v2/everything");

        let without_slash = NewsApiService::new(&ApiConfig {
            base_url: "https://example.com/v2".to_string(),
            ..ApiConfig::default()
        });
        assert_eq!(without_slash.search_url(), "https://example.com/v2/everything");
    }
}
