//! The HTTP API.

use crate::infra::state::AppState;
use axum::Router;

pub mod item_api;

/// Constructs the REST API, without middleware.
pub fn api(state: AppState) -> Router {
    Router::new().merge(item_api::routes()).with_state(state)
}
