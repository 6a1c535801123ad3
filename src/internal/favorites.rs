use anyhow::{Context, Result};
use tracing::{error, info, warn};

use super::error::ValidationError;
use super::models::{Article, FavoriteArticle};
use super::storage::SlotStorage;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Durable, append-ordered list of rated articles keyed by title.
///
/// Every mutation rewrites the whole slot. Loading never fails: a missing or
/// unreadable slot starts the store empty.
pub struct FavoritesStore {
    items: Vec<FavoriteArticle>,
    storage: Box<dyn SlotStorage>,
    slot: String,
}

impl FavoritesStore {
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: Box<dyn SlotStorage>, slot: &str) -> Self {
        let items = match Self::read_items(storage.as_ref(), slot) {
            Ok(Some(items)) => {
                info!(slot, count = items.len(), "Loaded favorites");
                items
            }
            Ok(None) => {
                info!(slot, "No stored favorites, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(slot, "Stored favorites unreadable, starting empty: {:#}", e);
                Vec::new()
            }
        };

        Self {
            items,
            storage,
            slot: slot.to_string(),
        }
    }

    fn read_items(storage: &dyn SlotStorage, slot: &str) -> Result<Option<Vec<FavoriteArticle>>> {
        let Some(content) = storage.read(slot)? else {
            return Ok(None);
        };
        // A slot holding JSON `null` counts as empty.
        let items: Option<Vec<FavoriteArticle>> =
            serde_json::from_str(&content).context("Failed to parse favorites")?;
        Ok(Some(items.unwrap_or_default()))
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self.items).context("Failed to serialize favorites")?;
        self.storage.write(&self.slot, &content)?;
        info!(slot = %self.slot, count = self.items.len(), "Saved favorites");
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!(slot = %self.slot, "Failed to persist favorites: {:#}", e);
        }
    }

    /// Append `article` with `rating`. Rejected without any change when the
    /// rating is outside 1..=5 or the title is already stored.
    pub fn add(&mut self, article: &Article, rating: u8) -> Result<(), ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        if self.is_favorite(&article.title) {
            return Err(ValidationError::DuplicateTitle(article.title.clone()));
        }

        self.items.push(FavoriteArticle {
            article: article.clone(),
            rating,
        });
        self.persist();
        Ok(())
    }

    /// Remove every entry whose title matches. Returns how many were removed.
    pub fn remove(&mut self, title: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|f| f.title() != title);
        let removed = before - self.items.len();
        self.persist();
        removed
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.items.iter().any(|f| f.title() == title)
    }

    pub fn rating_of(&self, title: &str) -> Option<u8> {
        self.items
            .iter()
            .find(|f| f.title() == title)
            .map(|f| f.rating)
    }

    pub fn items(&self) -> &[FavoriteArticle] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
