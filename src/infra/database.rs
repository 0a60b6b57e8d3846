//! For interacting with the database.

use super::config::DatabaseConfig;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    ConnectOptions, Sqlite, SqlitePool, Transaction,
};
use std::str::FromStr;
use tracing::log::LevelFilter;

/// A common transaction type.
/// Use this for the persistence layer.
pub type Tx = Transaction<'static, Sqlite>;

/// A common database pool type.
pub type DbPool = SqlitePool;

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        price REAL NOT NULL,
        description TEXT NOT NULL
    )
"#;

/// Owns the connection pool and makes sure the schema exists.
///
/// Cloning is cheap, all clones share the same pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connects to the database based on some configuration and bootstraps the schema.
    #[tracing::instrument(skip_all, fields(url = %config.url))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .log_statements(LevelFilter::Debug);
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(config.acquire_timeout)
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        tracing::info!("Connected to database");
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and bootstraps the schema.
    pub async fn from_pool(pool: DbPool) -> Result<Self, sqlx::Error> {
        let db = Self { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_ITEMS_TABLE).execute(&self.pool).await?;
        tracing::debug!("Ensured items table exists");
        Ok(())
    }

    /// Returns the database pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Starts a new transaction.
    pub async fn begin(&self) -> Result<Tx, sqlx::Error> {
        self.pool.begin().await
    }
}
