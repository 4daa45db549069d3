use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use super::{StorageBackend, StoreError};

/// SQLite-backed blob storage: one row per collection.
#[derive(Clone)]
pub struct SqliteBackend {
    db: SqlitePool,
}

impl SqliteBackend {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        // An in-memory database only exists per connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Self::from_pool(db).await
    }

    pub async fn from_pool(db: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&db).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let blob: Option<Vec<u8>> = sqlx::query_scalar("SELECT blob FROM collections WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;
        Ok(blob)
    }

    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO collections (key, blob, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET blob = excluded.blob, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(blob)
        .bind(now)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
