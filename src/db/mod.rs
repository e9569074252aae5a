//! Storage clients for the `comments` table.
//!
//! Production runs against MySQL; SQLite backs local development and the
//! test suite. Both speak the same `?` placeholder dialect, so the statements
//! below are shared.

use crate::models::{Comment, CommentUpdate, NewComment};

/// Every read selects through this so deleted rows never leak out.
macro_rules! select_live {
    ($tail:literal) => {
        concat!(
            "SELECT id, created_at, updated_at, deleted_at, is_deleted, slug, body, author ",
            "FROM comments WHERE is_deleted = FALSE",
            $tail
        )
    };
}

/// The methods of [`CommentStore`] whose statements are identical on every
/// backend. Expanded inside each `impl CommentStore` block, which only adds
/// `migrate` and `insert`.
macro_rules! shared_comment_queries {
    () => {
        async fn ping(&self) -> Result<(), sqlx::Error> {
            let mut conn = self.pool.acquire().await?;
            sqlx::Connection::ping(&mut *conn).await
        }

        async fn find(&self, id: i64) -> Result<Option<$crate::models::Comment>, sqlx::Error> {
            sqlx::query_as::<_, $crate::models::Comment>($crate::db::FIND_BY_ID)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
        }

        async fn find_by_slug(
            &self,
            slug: &str,
        ) -> Result<Vec<$crate::models::Comment>, sqlx::Error> {
            sqlx::query_as::<_, $crate::models::Comment>($crate::db::FIND_BY_SLUG)
                .bind(slug)
                .fetch_all(&self.pool)
                .await
        }

        async fn find_all(&self) -> Result<Vec<$crate::models::Comment>, sqlx::Error> {
            sqlx::query_as::<_, $crate::models::Comment>($crate::db::FIND_ALL)
                .fetch_all(&self.pool)
                .await
        }

        async fn update(
            &self,
            id: i64,
            update: &$crate::models::CommentUpdate,
        ) -> Result<bool, sqlx::Error> {
            let result = sqlx::query($crate::db::UPDATE)
                .bind(update.slug.as_deref())
                .bind(update.body.as_deref())
                .bind(update.author.as_deref())
                .bind(chrono::Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }

        async fn soft_delete(&self, id: i64) -> Result<bool, sqlx::Error> {
            let now = chrono::Utc::now();
            let result = sqlx::query($crate::db::SOFT_DELETE)
                .bind(now)
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        }
    };
}

pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;

const FIND_BY_ID: &str = select_live!(" AND id = ?");
const FIND_BY_SLUG: &str = select_live!(" AND slug = ? ORDER BY id ASC");
const FIND_ALL: &str = select_live!(" ORDER BY id ASC");
const FIND_INSERTED: &str =
    "SELECT id, created_at, updated_at, deleted_at, is_deleted, slug, body, author FROM comments WHERE id = ?";
const INSERT: &str = "INSERT INTO comments (slug, body, author, is_deleted, deleted_at, created_at, updated_at) \
     VALUES (?, ?, ?, FALSE, NULL, ?, ?)";
// Absent fields bind NULL and keep the stored value, so concurrent partial
// updates never write back stale columns.
const UPDATE: &str = "UPDATE comments SET slug = COALESCE(?, slug), body = COALESCE(?, body), \
     author = COALESCE(?, author), updated_at = ? WHERE id = ? AND is_deleted = FALSE";
const SOFT_DELETE: &str = "UPDATE comments SET is_deleted = TRUE, deleted_at = ?, updated_at = ? \
     WHERE id = ? AND is_deleted = FALSE";

/// Row-level access to the `comments` table.
///
/// Implementations are cheap handles around a connection pool; cloning one
/// shares the pool.
pub trait CommentStore: Clone + Send + Sync + 'static {
    /// Checks that the database answers on a live connection.
    fn ping(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Creates the `comments` table and its index when missing.
    fn migrate(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    fn find(&self, id: i64) -> impl Future<Output = Result<Option<Comment>, sqlx::Error>> + Send;

    fn find_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Vec<Comment>, sqlx::Error>> + Send;

    fn find_all(&self) -> impl Future<Output = Result<Vec<Comment>, sqlx::Error>> + Send;

    /// Inserts a row and returns it as stored.
    fn insert(&self, input: &NewComment) -> impl Future<Output = Result<Comment, sqlx::Error>> + Send;

    /// Writes the fields present in `update` in a single statement. Returns
    /// `false` when no live row with that id exists.
    fn update(
        &self,
        id: i64,
        update: &CommentUpdate,
    ) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;

    /// Flags a live row as deleted. Returns `false` when there was none.
    fn soft_delete(&self, id: i64) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

/// Verifies connectivity and bootstraps the schema. Startup must stop on any
/// error returned here.
pub async fn prepare<S: CommentStore>(store: S) -> Result<S, sqlx::Error> {
    store.ping().await?;
    tracing::info!("Database connection verified");

    store.migrate().await?;
    tracing::info!("Database schema ready");

    Ok(store)
}
