//! Saved vendors and products.

use soko_core::prelude::*;
use soko_core::SokoError;
use soko_store::Collection;

/// Service over favorites.
#[derive(Clone)]
pub struct FavoriteService {
    favorites: Collection<Favorite>,
}

impl FavoriteService {
    pub fn new(favorites: Collection<Favorite>) -> Self {
        Self { favorites }
    }

    /// Save an item. Saving the same target twice is a conflict.
    pub async fn add(
        &self,
        user_id: &UserId,
        target: FavoriteTarget,
    ) -> Result<Favorite, SokoError> {
        let duplicate = self
            .favorites
            .find_one(|f| &f.user_id == user_id && f.target == target)
            .await;
        if duplicate.is_some() {
            return Err(SokoError::Conflict("already in favorites".into()));
        }

        let favorite = Favorite::new(user_id.clone(), target);
        self.favorites
            .insert(favorite.clone())
            .await
            .map_err(|e| SokoError::Store(e.to_string()))?;
        Ok(favorite)
    }

    /// Remove a saved item; only its owner may.
    pub async fn remove(&self, id: &FavoriteId, user_id: &UserId) -> Result<(), SokoError> {
        let favorite = self
            .favorites
            .get(id.as_str())
            .await
            .ok_or_else(|| SokoError::FavoriteNotFound(id.to_string()))?;
        if &favorite.user_id != user_id {
            return Err(SokoError::Forbidden(
                "you can only remove your own favorites".into(),
            ));
        }
        self.favorites.remove(id.as_str()).await;
        Ok(())
    }

    /// A user's saved items, optionally narrowed to products or vendors,
    /// newest first.
    pub async fn list(&self, user_id: &UserId, kind: Option<&str>) -> Vec<Favorite> {
        let mut favorites = self
            .favorites
            .find(|f| &f.user_id == user_id && kind.map_or(true, |k| f.target.as_str() == k))
            .await;
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        favorites
    }
}
