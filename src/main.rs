//! Starts the item service.

use items_api::{
    app,
    core::item::{item_repository::SqlItemRepository, item_service::ItemService},
    infra::{config, database::Database, logging, state::AppState},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = config::load_config()?;
    let _guard = logging::init_logging(&config.logging);

    let db = Database::connect(&config.database).await?;
    let state = AppState::new(ItemService::new(SqlItemRepository::new(db)));

    let listener = TcpListener::bind((
        config.server.http_address.as_str(),
        config.server.http_port,
    ))
    .await?;
    app::run_app(listener, state, config.server).await?;

    Ok(())
}
