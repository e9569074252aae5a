use chrono::Utc;
use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

use super::{CommentStore, FIND_INSERTED, INSERT};
use crate::config::MySqlSettings;
use crate::models::{Comment, NewComment};

#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn connect(settings: &MySqlSettings) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect_with(settings.connect_options())
            .await?;

        Ok(Self::new(pool))
    }
}

/// Connects, pings and migrates.
pub async fn init_db(settings: &MySqlSettings) -> Result<MySqlStore, sqlx::Error> {
    tracing::info!(host = %settings.host, port = settings.port, database = %settings.database, "Connecting to MySQL");
    let store = MySqlStore::connect(settings).await?;
    super::prepare(store).await
}

impl CommentStore for MySqlStore {
    shared_comment_queries!();

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                slug VARCHAR(191) NOT NULL,
                body TEXT NOT NULL,
                author VARCHAR(255) NOT NULL,
                is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
                deleted_at DATETIME(6) NULL,
                created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
                updated_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
                INDEX idx_comments_slug_is_deleted (slug, is_deleted)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
            "#,
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
            .bind(result.last_insert_id() as i64)
            .fetch_one(&self.pool)
            .await
    }
}
