use serde::{Deserialize, Serialize};

/// Publisher block attached to every article by the news API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single search hit. `title` doubles as the identity used to match favorites.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// An article the user rated and kept. Stored flattened, i.e. the article
/// object with an extra `rating` field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FavoriteArticle {
    #[serde(flatten)]
    pub article: Article,
    pub rating: u8,
}

impl FavoriteArticle {
    pub fn title(&self) -> &str {
        &self.article.title
    }
}

/// Envelope returned by the `everything` endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserializes_api_shape() {
        let json = r#"{
            "source": { "id": null, "name": "Example Times" },
            "author": "Jane Doe",
            "title": "Bitcoin rallies",
            "description": "Prices up",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.png",
            "publishedAt": "2024-01-15T10:00:00Z",
            "content": "Lorem ipsum... [+842 chars]"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "Bitcoin rallies");
        assert_eq!(article.source.name.as_deref(), Some("Example Times"));
        assert_eq!(
            article.url_to_image.as_deref(),
            Some("https://example.com/a.png")
        );
        assert_eq!(
            article.published_at.as_deref(),
            Some("2024-01-15T10:00:00Z")
        );
    }

    #[test]
    fn test_article_without_title_is_rejected() {
        let json = r#"{ "author": "nobody" }"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn test_favorite_serializes_flat_with_rating() {
        let favorite = FavoriteArticle {
            article: Article {
                title: "Flat".to_string(),
                ..Default::default()
            },
            rating: 4,
        };

        let value = serde_json::to_value(&favorite).unwrap();
        assert_eq!(value["title"], "Flat");
        assert_eq!(value["rating"], 4);
        assert!(value.get("article").is_none());
    }
}
