//! OpenAPI configuration.

use crate::{
    api::item_api,
    core::item::item_entity::{Item, NewItem},
};
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        item_api::list_items,
        item_api::get_item,
        item_api::create_item,
        item_api::update_item,
        item_api::delete_item,
    ),
    components(schemas(Item, NewItem))
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;
