use std::str::FromStr;

use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use super::{CommentStore, FIND_INSERTED, INSERT};
use crate::models::{Comment, NewComment};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to `:memory:` opens a separate database, so keep
        // exactly one alive for the lifetime of the pool.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;

        Ok(Self::new(pool))
    }
}

/// Connects, pings and migrates.
pub async fn init_db(database_url: &str) -> Result<SqliteStore, sqlx::Error> {
    tracing::info!(url = %database_url, "Opening SQLite database");
    let store = SqliteStore::connect(database_url).await?;
    super::prepare(store).await
}

impl CommentStore for SqliteStore {
    shared_comment_queries!();

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL,
                body TEXT NOT NULL,
                author TEXT NOT NULL,
                is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
                deleted_at DATETIME,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_comments_slug_is_deleted ON comments (slug, is_deleted)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert(&self, input: &NewComment) -> Result<Comment, sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query(INSERT)
            .bind(&input.slug)
            .bind(&input.body)
            .bind(&input.author)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        sqlx::query_as::<_, Comment>(FIND_INSERTED)
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await
    }
}
