//! Document collection backed by SQLite.
//!
//! Each entry is one row holding its backend-shape JSON document, keyed by
//! id and indexed by `added_at` for newest-first listing.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use watchlist_models::{to_wire, ItemId, ItemPatch, ListItem, WireShape};
use watchlist_store::{ListStore, StoreError};

pub struct SqliteListStore {
    url: String,
    // opened on first use, then shared for the life of the store
    pool: OnceCell<SqlitePool>,
}

impl SqliteListStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: OnceCell::new(),
        }
    }

    async fn pool(&self) -> Result<&SqlitePool, StoreError> {
        self.pool
            .get_or_try_init(|| async {
                let pool = connect(&self.url).await.map_err(|e| {
                    StoreError::NotConfigured(format!("could not open database {}: {}", self.url, e))
                })?;
                info!("Opened document store at {}", self.url);
                Ok(pool)
            })
            .await
    }

    fn backend_error(&self, err: sqlx::Error) -> StoreError {
        StoreError::Backend(format!("{}: {}", self.url, err))
    }

    fn parse_document(&self, doc: &str) -> Result<ListItem, StoreError> {
        serde_json::from_str::<Value>(doc)
            .and_then(ListItem::from_wire)
            .map_err(|e| StoreError::Decode {
                url: self.url.clone(),
                message: e.to_string(),
            })
    }

    fn document(item: &ListItem) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&to_wire(item, WireShape::Backend))?)
    }
}

async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY,
            added_at TEXT NOT NULL,
            doc TEXT NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_movies_added_at ON movies(added_at)")
        .execute(&pool)
        .await?;

    Ok(pool)
}

#[async_trait]
impl ListStore for SqliteListStore {
    fn store_name(&self) -> &str {
        "document"
    }

    fn wire_shape(&self) -> WireShape {
        WireShape::Backend
    }

    async fn list(&self) -> Result<Vec<ListItem>, StoreError> {
        let pool = self.pool().await?;
        let rows = sqlx::query("SELECT doc FROM movies ORDER BY added_at DESC")
            .fetch_all(pool)
            .await
            .map_err(|e| self.backend_error(e))?;

        let items = rows
            .iter()
            .map(|row| self.parse_document(row.get("doc")))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Document store listed {} items", items.len());
        Ok(items)
    }

    async fn create(&self, item: ListItem) -> Result<ListItem, StoreError> {
        let pool = self.pool().await?;
        let result = sqlx::query("INSERT OR IGNORE INTO movies (id, added_at, doc) VALUES (?, ?, ?)")
            .bind(item.id.get())
            .bind(&item.added_at)
            .bind(Self::document(&item)?)
            .execute(pool)
            .await
            .map_err(|e| self.backend_error(e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(item.id));
        }
        Ok(item)
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<ListItem>, StoreError> {
        let pool = self.pool().await?;
        let row = sqlx::query("SELECT doc FROM movies WHERE id = ?")
            .bind(id.get())
            .fetch_optional(pool)
            .await
            .map_err(|e| self.backend_error(e))?
            .ok_or(StoreError::NotFound(id))?;

        let mut item = self.parse_document(row.get("doc"))?;
        item.apply(patch);

        sqlx::query("UPDATE movies SET doc = ? WHERE id = ?")
            .bind(Self::document(&item)?)
            .bind(id.get())
            .execute(pool)
            .await
            .map_err(|e| self.backend_error(e))?;
        Ok(Some(item))
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id.get())
            .execute(pool)
            .await
            .map_err(|e| self.backend_error(e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
