// SQLite document store. Each collection is a set of JSON documents kept in insertion order.

use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct MetricStore {
    pool: SqlitePool,
}

impl MetricStore {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                body TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, docs), fields(store = "documents", operation = "insert_documents", docs_count = docs.len()))]
    pub async fn insert_documents(&self, collection: &str, docs: &[Value]) -> anyhow::Result<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for doc in docs {
            sqlx::query("INSERT INTO documents (collection, body) VALUES ($1, $2)")
                .bind(collection)
                .bind(serde_json::to_string(doc)?)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Walks the collection with a streaming cursor, handing each document to `f`.
    /// Bodies that are not valid JSON are skipped. Returns the number of documents visited.
    #[instrument(skip(self, f), fields(store = "documents", operation = "for_each_document"))]
    pub async fn for_each_document<F>(&self, collection: &str, mut f: F) -> anyhow::Result<u64>
    where
        F: FnMut(Value),
    {
        let mut rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY id ASC",
        )
        .bind(collection)
        .fetch(&self.pool);

        let mut visited = 0;
        while let Some(row) = rows.try_next().await? {
            let body: String = row.try_get("body")?;
            match serde_json::from_str(&body) {
                Ok(doc) => {
                    f(doc);
                    visited += 1;
                }
                Err(e) => tracing::debug!(error = %e, "skipping unparseable document"),
            }
        }
        Ok(visited)
    }

    /// Full unsorted fetch of a collection.
    pub async fn fetch_collection(&self, collection: &str) -> anyhow::Result<Vec<Value>> {
        let mut out = Vec::new();
        self.for_each_document(collection, |doc| out.push(doc))
            .await?;
        Ok(out)
    }

    pub async fn count(&self, collection: &str) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE collection = $1",
        )
        .bind(collection)
        .fetch_one(&self.pool)
        .await?;
        Ok(n)
    }

    #[instrument(skip(self), fields(store = "documents", operation = "clear_collection"))]
    pub async fn clear_collection(&self, collection: &str) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }
}
