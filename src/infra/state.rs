//! Global application state.
//!
//! Used for access to common resources such as the item service.

use crate::core::item::item_service::ItemService;
use axum::extract::FromRef;

/// Global application state.
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    items: ItemService,
}

impl AppState {
    /// Constructs a new [`AppState`].
    pub fn new(items: ItemService) -> Self {
        Self { items }
    }
}
