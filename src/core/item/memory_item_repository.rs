//! An item repository that keeps everything in memory.
//!
//! Behaves like [`SqlItemRepository`](super::item_repository::SqlItemRepository)
//! without a database, which makes it a good collaborator in tests.

use super::{
    item_entity::{Item, NewItem},
    item_repository::{ItemRepository, ITEM_NOT_FOUND},
};
use crate::infra::{
    error::{ApiError, ApiResult},
    validation::Valid,
};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::instrument;
use uuid::Uuid;

/// An in-memory item repository, keyed by id like the `items` table.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: Mutex<HashMap<Uuid, Item>>,
}

impl InMemoryItemRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, HashMap<Uuid, Item>> {
        // Every mutation is a single insert or remove, so a poisoned map is still consistent.
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl ItemRepository for InMemoryItemRepository {
    #[instrument(skip(self))]
    async fn get_items(&self) -> ApiResult<Vec<Item>> {
        Ok(self.items().values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn get_item_by_name(&self, name: &str) -> ApiResult<Item> {
        self.items()
            .values()
            .find(|item| item.name() == name)
            .cloned()
            .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))
    }

    #[instrument(skip(self))]
    async fn create_item(&self, new_item: NewItem) -> ApiResult<Item> {
        let item = Item::from_valid(Valid::new(new_item)?);
        self.items().insert(item.id(), item.clone());
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn update_item(&self, name: &str, new_item: Valid<NewItem>) -> ApiResult<Item> {
        let mut items = self.items();
        let ids: Vec<Uuid> = items
            .values()
            .filter(|item| item.name() == name)
            .map(Item::id)
            .collect();
        let Some(first) = ids.first().copied() else {
            tracing::warn!("Item not found");
            return Err(ApiError::not_found(ITEM_NOT_FOUND));
        };
        for id in ids {
            items.insert(id, Item::with_id(id, new_item.clone()));
        }
        Ok(Item::with_id(first, new_item))
    }

    #[instrument(skip(self))]
    async fn delete_item(&self, name: &str) -> ApiResult<()> {
        let mut items = self.items();
        let before = items.len();
        items.retain(|_, item| item.name() != name);
        if items.len() == before {
            tracing::warn!("Item not found");
            return Err(ApiError::not_found(ITEM_NOT_FOUND));
        }
        Ok(())
    }
}
