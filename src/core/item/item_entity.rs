//! The item entity and the rules for constructing one.

use crate::infra::{
    error::ValidationError,
    validation::{FieldOrder, Valid},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The values of an item, as sent by a client when creating or replacing one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct NewItem {
    /// The item's name. Unique among items.
    #[schema(example = "widget")]
    #[validate(length(min = 1, message = "name required"))]
    pub name: String,
    /// The item's price. Must be positive and finite.
    #[schema(example = 9.99)]
    #[validate(range(exclusive_min = 0.0, max = f64::MAX, message = "price must be positive"))]
    pub price: f64,
    /// The item's description.
    #[schema(example = "a widget")]
    #[validate(length(min = 1, message = "description required"))]
    pub description: String,
}

impl FieldOrder for NewItem {
    const FIELD_ORDER: &'static [&'static str] = &["name", "price", "description"];
}

impl NewItem {
    /// Constructs a new, unvalidated, [`NewItem`].
    pub fn new(name: impl Into<String>, price: f64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            description: description.into(),
        }
    }
}

/// An existing item.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize))]
pub struct Item {
    /// The item's id. Never changes.
    id: Uuid,
    /// The item's name.
    #[schema(example = "widget")]
    name: String,
    /// The item's price.
    #[schema(example = 9.99)]
    price: f64,
    /// The item's description.
    #[schema(example = "a widget")]
    description: String,
}

impl Item {
    /// Validates the values and gives the item a fresh id.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let new_item = Valid::new(NewItem::new(name, price, description))?;
        Ok(Self::from_valid(new_item))
    }

    /// Gives already validated values a fresh id.
    pub fn from_valid(new_item: Valid<NewItem>) -> Self {
        Self::with_id(Uuid::new_v4(), new_item)
    }

    /// Puts new values under an existing id.
    pub(crate) fn with_id(id: Uuid, new_item: Valid<NewItem>) -> Self {
        let NewItem {
            name,
            price,
            description,
        } = new_item.into_inner();
        Self {
            id,
            name,
            price,
            description,
        }
    }

    /// Restores an item from storage, where it was validated on the way in.
    pub(crate) fn from_stored(id: Uuid, name: String, price: f64, description: String) -> Self {
        Self {
            id,
            name,
            price,
            description,
        }
    }

    /// The item's id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The item's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The item's price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// The item's description.
    pub fn description(&self) -> &str {
        &self.description
    }
}
