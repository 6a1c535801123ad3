use once_cell::sync::Lazy;
use regex::Regex;

use super::models::FavoriteArticle;

/// Characters of body text the news API returns before truncating.
pub const PREVIEW_CHARS: usize = 214;

static TRUNCATION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\+(\d+) chars\]").expect("truncation marker regex is valid")
});

/// Aggregate figures shown above the favorites list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Mean rating, `0.0` when there are no favorites.
    pub average_rating: f64,
    /// Mean reconstructed article length over favorites whose content carries
    /// a truncation marker. `None` when no favorite qualifies.
    pub average_content_length: Option<f64>,
}

/// Reconstruct the full length of an article from its truncated content,
/// e.g. `"... [+842 chars]"` gives `842 + 214`. Returns `None` when the
/// marker is absent or malformed.
pub fn full_content_length(content: &str) -> Option<usize> {
    let caps = TRUNCATION_MARKER.captures(content)?;
    let remaining: usize = caps.get(1)?.as_str().parse().ok()?;
    remaining.checked_add(PREVIEW_CHARS)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    match n {
        0 => None,
        n => Some(sum / n as f64),
    }
}

pub fn summarize(favorites: &[FavoriteArticle]) -> Summary {
    let average_rating = mean(favorites.iter().map(|f| f64::from(f.rating))).unwrap_or(0.0);

    let average_content_length = mean(favorites.iter().filter_map(|f| {
        f.article
            .content
            .as_deref()
            .and_then(full_content_length)
            .map(|len| len as f64)
    }));

    Summary {
        count: favorites.len(),
        average_rating,
        average_content_length,
    }
}
