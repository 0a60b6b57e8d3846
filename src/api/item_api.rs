//! The item API implementation.
//!
//! Failures are plain text. Most collapse to 500; only a missing item on a
//! read or a delete gives 404, and a missing name gives 400.

use crate::{
    core::item::{
        item_entity::{Item, NewItem},
        item_service::ItemService,
    },
    infra::{
        error::{ApiResult, ErrorResponse},
        extract::Json,
        state::AppState,
    },
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

const NAME_REQUIRED: &str = "name is required";

/// The item API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_items)
        .typed_post(create_item)
        .typed_get(get_item)
        .typed_put(update_item)
        .typed_delete(delete_item)
        .typed_get(get_item_without_name)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/items", rejection(ErrorResponse))]
pub struct Items;

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/", rejection(ErrorResponse))]
pub struct ItemsWithoutName;

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/:name", rejection(ErrorResponse))]
pub struct ItemsName {
    name: String,
}

/// Lists all items.
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "Success", body = [Item]),
        (status = 500, description = "Internal error", body = String),
    )
)]
#[instrument(skip_all)]
pub async fn list_items(
    Items: Items,
    State(items): State<ItemService>,
) -> ApiResult<Json<Vec<Item>>> {
    let items = items.get_items().await?;
    Ok(Json(items))
}

/// Gets an item.
#[utoipa::path(
    get,
    path = "/items/{name}",
    params(("name" = String, Path, description = "The item's name")),
    responses(
        (status = 200, description = "Ok", body = Item),
        (status = 404, description = "Not Found", body = String),
        (status = 500, description = "Internal Server Error", body = String),
    )
)]
#[instrument(skip_all, fields(name = %name))]
pub async fn get_item(
    ItemsName { name }: ItemsName,
    State(items): State<ItemService>,
) -> Result<Json<Item>, ErrorResponse> {
    let item = items.get_item_by_name(&name).await?;
    Ok(Json(item))
}

/// `GET /items/` names no item.
async fn get_item_without_name(_: ItemsWithoutName) -> ErrorResponse {
    ErrorResponse::new(StatusCode::BAD_REQUEST, NAME_REQUIRED)
}

/// Creates a new item.
#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Created"),
        (status = 500, description = "Invalid, duplicate, or not stored", body = String),
    )
)]
#[instrument(skip_all, fields(name = %new_item.name))]
pub async fn create_item(
    Items: Items,
    State(items): State<ItemService>,
    Json(new_item): Json<NewItem>,
) -> Result<StatusCode, ErrorResponse> {
    items
        .create_item(new_item)
        .await
        .map_err(|e| e.with_status(StatusCode::INTERNAL_SERVER_ERROR))?;
    Ok(StatusCode::CREATED)
}

/// Replaces the values of an item.
#[utoipa::path(
    put,
    path = "/items/{name}",
    params(("name" = String, Path, description = "The item's current name")),
    request_body = NewItem,
    responses(
        (status = 204, description = "Updated"),
        (status = 500, description = "Invalid, missing, or not stored", body = String),
    )
)]
#[instrument(skip_all, fields(name = %name))]
pub async fn update_item(
    ItemsName { name }: ItemsName,
    State(items): State<ItemService>,
    Json(new_item): Json<NewItem>,
) -> Result<StatusCode, ErrorResponse> {
    items
        .update_item(&name, new_item)
        .await
        .map_err(|e| e.with_status(StatusCode::INTERNAL_SERVER_ERROR))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes an item.
#[utoipa::path(
    delete,
    path = "/items/{name}",
    params(("name" = String, Path, description = "The item's name")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = String),
        (status = 500, description = "Internal Server Error", body = String),
    )
)]
#[instrument(skip_all, fields(name = %name))]
pub async fn delete_item(
    ItemsName { name }: ItemsName,
    State(items): State<ItemService>,
) -> Result<StatusCode, ErrorResponse> {
    items.delete_item(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::item::{
            item_repository::MockItemRepository, memory_item_repository::InMemoryItemRepository,
        },
        infra::error::ApiError,
    };
    use axum::{body::Body, response::Response};
    use http::{header::CONTENT_TYPE, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        crate::api::api(AppState::new(ItemService::new(
            InMemoryItemRepository::new(),
        )))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const WIDGET: &str = r#"{"name": "widget", "price": 9.99, "description": "a widget"}"#;

    async fn create_widget(app: &Router) {
        let res = app
            .clone()
            .oneshot(json_request("POST", "/items", WIDGET))
            .await
            .unwrap();
        assert_eq!(StatusCode::CREATED, res.status());
    }

    #[tokio::test]
    async fn list_on_empty_store_is_an_empty_array() {
        let res = test_app().oneshot(empty_request("GET", "/items")).await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
        assert_eq!("[]", body_text(res).await);
    }

    #[tokio::test]
    async fn list_returns_created_items() {
        let app = test_app();
        create_widget(&app).await;
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/items",
                r#"{"name": "gadget", "price": 1.5, "description": "a gadget"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(StatusCode::CREATED, res.status());

        let res = app.oneshot(empty_request("GET", "/items")).await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let items: Vec<Item> = serde_json::from_str(&body_text(res).await).unwrap();
        assert_eq!(2, items.len());
    }

    #[tokio::test]
    async fn create_returns_201_with_empty_body() {
        let res = test_app()
            .oneshot(json_request("POST", "/items", WIDGET))
            .await
            .unwrap();
        assert_eq!(StatusCode::CREATED, res.status());
        assert_eq!("", body_text(res).await);
    }

    #[tokio::test]
    async fn create_duplicate_is_500_with_message() {
        let app = test_app();
        create_widget(&app).await;
        let res = app
            .oneshot(json_request("POST", "/items", WIDGET))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert_eq!("item already exists", body_text(res).await);
    }

    #[tokio::test]
    async fn create_invalid_item_is_500_with_reason() {
        let res = test_app()
            .oneshot(json_request(
                "POST",
                "/items",
                r#"{"name": "widget", "price": 0, "description": "a widget"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert_eq!("price must be positive", body_text(res).await);
    }

    #[tokio::test]
    async fn create_with_malformed_body_is_500_with_decode_error() {
        let res = test_app()
            .oneshot(json_request("POST", "/items", r#"{"name": "widget""#))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert!(!body_text(res).await.is_empty());
    }

    #[tokio::test]
    async fn get_returns_item() {
        let app = test_app();
        create_widget(&app).await;
        let res = app
            .oneshot(empty_request("GET", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let body = body_text(res).await;
        assert!(body.contains(r#""name":"widget""#));
        let item: Item = serde_json::from_str(&body).unwrap();
        assert_eq!(9.99, item.price());
    }

    #[tokio::test]
    async fn get_missing_item_is_404() {
        let res = test_app()
            .oneshot(empty_request("GET", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, res.status());
        assert_eq!("item not found", body_text(res).await);
    }

    #[tokio::test]
    async fn get_without_name_is_400() {
        let res = test_app()
            .oneshot(empty_request("GET", "/items/"))
            .await
            .unwrap();
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        assert_eq!(NAME_REQUIRED, body_text(res).await);
    }

    #[tokio::test]
    async fn whitespace_name_can_be_read_back() {
        let app = test_app();
        let res = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/items",
                r#"{"name": " ", "price": 1.0, "description": "blank"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(StatusCode::CREATED, res.status());

        let res = app
            .clone()
            .oneshot(empty_request("GET", "/items/%20"))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let item: Item = serde_json::from_str(&body_text(res).await).unwrap();
        assert_eq!(" ", item.name());

        let res = app
            .oneshot(empty_request("DELETE", "/items/%20"))
            .await
            .unwrap();
        assert_eq!(StatusCode::NO_CONTENT, res.status());
    }

    #[tokio::test]
    async fn update_returns_204_and_replaces_values() {
        let app = test_app();
        create_widget(&app).await;
        let res = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/items/widget",
                r#"{"name": "gadget", "price": 19.99, "description": "a gadget"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(StatusCode::NO_CONTENT, res.status());
        assert_eq!("", body_text(res).await);

        let res = app
            .clone()
            .oneshot(empty_request("GET", "/items/gadget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, res.status());
        let res = app
            .oneshot(empty_request("GET", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, res.status());
    }

    #[tokio::test]
    async fn update_missing_item_is_500() {
        let res = test_app()
            .oneshot(json_request("PUT", "/items/widget", WIDGET))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert_eq!("item does not exist", body_text(res).await);
    }

    #[tokio::test]
    async fn update_missing_item_with_invalid_body_does_not_exist() {
        let res = test_app()
            .oneshot(json_request(
                "PUT",
                "/items/missing",
                r#"{"name": "widget", "price": 0, "description": "a widget"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert_eq!("item does not exist", body_text(res).await);
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_500() {
        let app = test_app();
        create_widget(&app).await;
        let res = app
            .oneshot(json_request("PUT", "/items/widget", "not json"))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    }

    #[tokio::test]
    async fn delete_returns_204() {
        let app = test_app();
        create_widget(&app).await;
        let res = app
            .clone()
            .oneshot(empty_request("DELETE", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::NO_CONTENT, res.status());
        assert_eq!("", body_text(res).await);

        let res = app
            .oneshot(empty_request("GET", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, res.status());
    }

    #[tokio::test]
    async fn delete_missing_item_is_404_once() {
        let res = test_app()
            .oneshot(empty_request("DELETE", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, res.status());
        assert_eq!("item not found", body_text(res).await);
    }

    #[tokio::test]
    async fn storage_failure_is_500() {
        let mut repo = MockItemRepository::new();
        repo.expect_get_items().return_once(|| {
            Err(ApiError::storage(
                "failed to fetch items",
                sqlx::Error::PoolClosed,
            ))
        });
        let app = crate::api::api(AppState::new(ItemService::new(repo)));

        let res = app.oneshot(empty_request("GET", "/items")).await.unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert!(body_text(res).await.starts_with("failed to fetch items: "));
    }

    #[tokio::test]
    async fn delete_storage_failure_is_500() {
        let mut repo = MockItemRepository::new();
        repo.expect_get_item_by_name()
            .return_once(|_| Item::new("widget", 9.99, "a widget").map_err(ApiError::from));
        repo.expect_delete_item().return_once(|_| {
            Err(ApiError::storage(
                "failed to delete item",
                sqlx::Error::PoolClosed,
            ))
        });
        let app = crate::api::api(AppState::new(ItemService::new(repo)));

        let res = app
            .oneshot(empty_request("DELETE", "/items/widget"))
            .await
            .unwrap();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
        assert!(body_text(res).await.starts_with("failed to delete item: "));
    }
}
