//! A service for interacting with items.
//!
//! Adds the rules that span more than one repository call. The lookup and
//! the write that follows are separate calls, so two concurrent requests
//! for the same name can both pass the lookup.

use super::{
    item_entity::{Item, NewItem},
    item_repository::ItemRepository,
};
use crate::infra::{
    error::{ApiError, ApiResult},
    validation::Valid,
};
use std::{fmt, sync::Arc};
use tracing::instrument;

/// The item use cases, over any [`ItemRepository`].
#[derive(Clone)]
pub struct ItemService {
    repository: Arc<dyn ItemRepository>,
}

impl fmt::Debug for ItemService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemService").finish_non_exhaustive()
    }
}

impl ItemService {
    /// Creates a new service.
    pub fn new(repository: impl ItemRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Lists all items.
    #[instrument(skip(self))]
    pub async fn get_items(&self) -> ApiResult<Vec<Item>> {
        self.repository.get_items().await
    }

    /// Reads an item.
    #[instrument(skip(self))]
    pub async fn get_item_by_name(&self, name: &str) -> ApiResult<Item> {
        self.repository.get_item_by_name(name).await
    }

    /// Creates a new item, unless one with the same name exists.
    #[instrument(skip(self))]
    pub async fn create_item(&self, new_item: NewItem) -> ApiResult<Item> {
        match self.repository.get_item_by_name(&new_item.name).await {
            Ok(_) => {
                tracing::warn!("Item already exists");
                Err(ApiError::conflict("item already exists"))
            }
            Err(e) if e.is_not_found() => self.repository.create_item(new_item).await,
            Err(e) => Err(e),
        }
    }

    /// Replaces the values of an existing item.
    ///
    /// A missing item is reported before invalid values.
    #[instrument(skip(self))]
    pub async fn update_item(&self, name: &str, new_item: NewItem) -> ApiResult<Item> {
        match self.repository.get_item_by_name(name).await {
            Ok(_) => {
                let new_item = Valid::new(new_item)?;
                self.repository.update_item(name, new_item).await
            }
            Err(e) if e.is_not_found() => Err(ApiError::not_found("item does not exist")),
            Err(e) => Err(e),
        }
    }

    /// Deletes an existing item.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, name: &str) -> ApiResult<()> {
        self.repository.get_item_by_name(name).await?;
        self.repository.delete_item(name).await
    }
}
