//! The axum application: routes, middleware, and serving.

use crate::{
    core::item::{item_repository::SqlItemRepository, item_service::ItemService},
    infra::{
        config::ServerConfig,
        database::Database,
        error::PanicHandler,
        extract::Json,
        middleware::{log_request_response, MakeRequestIdSpan},
        openapi::ApiDoc,
        shutdown::shutdown_signal,
        state::AppState,
    },
};
use axum::{routing::get, Router};
use http::{header::AUTHORIZATION, StatusCode};
use std::{io, iter};
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

/// Constructs the full axum application.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(crate::api::api(state))
        // Layers
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(axum::middleware::from_fn(log_request_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(iter::once(
            AUTHORIZATION,
        )))
        .layer(ConcurrencyLimitLayer::new(config.concurrency_limit))
        .layer(CatchPanicLayer::custom(PanicHandler))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serves the application until a shutdown signal arrives.
pub async fn run_app(listener: TcpListener, state: AppState, config: ServerConfig) -> io::Result<()> {
    let app = app(state, &config).into_make_service();

    tracing::info!("Starting axum on {:?}", listener.local_addr());
    let exit_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match &exit_result {
        Ok(_) => tracing::info!("Successfully shut down"),
        Err(e) => tracing::error!("Shutdown failed: {}", e),
    }

    exit_result
}

/// Spawn a server on a random port with a custom database, returning its base url.
pub async fn spawn_app_with_db(db: Database) -> io::Result<String> {
    let address = "127.0.0.1";
    let listener = TcpListener::bind(format!("{address}:0")).await?;
    let port = listener.local_addr()?.port();
    let state = AppState::new(ItemService::new(SqlItemRepository::new(db)));
    tokio::spawn(run_app(listener, state, ServerConfig::default()));
    Ok(format!("http://{address}:{port}"))
}
