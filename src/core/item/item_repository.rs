//! Types and functions for storing and loading items from the database.

use crate::{
    core::item::item_entity::{Item, NewItem},
    infra::{
        database::Database,
        error::{ApiError, ApiResult},
        validation::Valid,
    },
};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use tracing::{instrument, Instrument};
use uuid::Uuid;

pub(crate) const ITEM_NOT_FOUND: &str = "item not found";

const SELECT_ITEMS: &str = "SELECT id, name, price, description FROM items";

const SELECT_ITEM_BY_NAME: &str =
    "SELECT id, name, price, description FROM items WHERE name = ?";

/// Anything that can store and load items.
///
/// Errors are [`ApiError::NotFound`] or [`ApiError::Storage`], plus
/// [`ApiError::Validation`] when [`ItemRepository::create_item`] is given bad values.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ItemRepository: Send + Sync {
    /// Lists all items, in no particular order.
    async fn get_items(&self) -> ApiResult<Vec<Item>>;

    /// Fetches the item with the given name.
    async fn get_item_by_name(&self, name: &str) -> ApiResult<Item>;

    /// Validates the values, gives them a fresh id and stores the item.
    /// Does not check that the name is free.
    async fn create_item(&self, new_item: NewItem) -> ApiResult<Item>;

    /// Replaces the values of the item with the given name, keeping its id.
    async fn update_item(&self, name: &str, new_item: Valid<NewItem>) -> ApiResult<Item>;

    /// Deletes the item with the given name.
    async fn delete_item(&self, name: &str) -> ApiResult<()>;
}

impl FromRow<'_, SqliteRow> for Item {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Item::from_stored(
            id,
            row.try_get("name")?,
            row.try_get("price")?,
            row.try_get("description")?,
        ))
    }
}

/// An item repository backed by SQLite.
#[derive(Clone, Debug)]
pub struct SqlItemRepository {
    db: Database,
}

impl SqlItemRepository {
    /// Creates a new repository.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl ItemRepository for SqlItemRepository {
    #[instrument(skip(self))]
    async fn get_items(&self) -> ApiResult<Vec<Item>> {
        tracing::info!("Listing items");
        let items = sqlx::query_as::<_, Item>(SELECT_ITEMS)
            .fetch_all(self.db.pool())
            .instrument(tracing::info_span!("fetch_all"))
            .await
            .map_err(|e| ApiError::storage("failed to fetch items", e))?;
        tracing::info!("Listed {} items", items.len());
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn get_item_by_name(&self, name: &str) -> ApiResult<Item> {
        tracing::info!("Reading item");
        let item = sqlx::query_as::<_, Item>(SELECT_ITEM_BY_NAME)
            .bind(name)
            .fetch_optional(self.db.pool())
            .instrument(tracing::info_span!("fetch_optional"))
            .await
            .map_err(|e| ApiError::storage("failed to get item by name", e))?;
        tracing::info!("Found item: {:?}", item);
        item.ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))
    }

    #[instrument(skip(self))]
    async fn create_item(&self, new_item: NewItem) -> ApiResult<Item> {
        let item = Item::from_valid(Valid::new(new_item)?);
        tracing::info!("Creating item {:?}", item);
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| ApiError::storage("could not begin transaction", e))?;
        sqlx::query("INSERT INTO items (id, name, price, description) VALUES (?, ?, ?, ?)")
            .bind(item.id().to_string())
            .bind(item.name())
            .bind(item.price())
            .bind(item.description())
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::storage("failed to insert item", e))?;
        tx.commit()
            .await
            .map_err(|e| ApiError::storage("could not commit transaction", e))?;
        tracing::info!("Created item {:?}", item);
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn update_item(&self, name: &str, new_item: Valid<NewItem>) -> ApiResult<Item> {
        tracing::info!("Updating item {:?}", new_item);
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| ApiError::storage("could not begin transaction", e))?;
        let existing = sqlx::query_as::<_, Item>(SELECT_ITEM_BY_NAME)
            .bind(name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| ApiError::storage("failed to get item in transaction", e))?
            .ok_or_else(|| {
                tracing::warn!("Item not found");
                ApiError::not_found(ITEM_NOT_FOUND)
            })?;
        let values = new_item.inner();
        sqlx::query("UPDATE items SET name = ?, price = ?, description = ? WHERE name = ?")
            .bind(&values.name)
            .bind(values.price)
            .bind(&values.description)
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::storage("failed to update item", e))?;
        tx.commit()
            .await
            .map_err(|e| ApiError::storage("could not commit transaction", e))?;
        let item = Item::with_id(existing.id(), new_item);
        tracing::info!("Updated item {:?}", item);
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete_item(&self, name: &str) -> ApiResult<()> {
        tracing::info!("Deleting item {:?}", name);
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| ApiError::storage("could not begin transaction", e))?;
        let rows = sqlx::query("DELETE FROM items WHERE name = ?")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::storage("failed to delete item", e))?;

        if rows.rows_affected() == 0 {
            tracing::warn!("Item not found");
            return Err(ApiError::not_found(ITEM_NOT_FOUND));
        }

        tx.commit()
            .await
            .map_err(|e| ApiError::storage("could not commit transaction", e))?;
        tracing::info!("Deleted item");

        Ok(())
    }
}
