use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment as stored in the `comments` table.
///
/// Deleted rows keep their data; `is_deleted` is the flag every read filters
/// on and `deleted_at` records when it was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub is_deleted: bool,
    pub slug: String,
    pub body: String,
    pub author: String,
}

/// Body of a create request. Server-assigned fields sent by the client
/// (`id`, timestamps) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub slug: String,
    pub body: String,
    pub author: String,
}

/// Body of an update request. Only the fields that are present change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentUpdate {
    pub slug: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

impl CommentUpdate {
    pub fn is_empty(&self) -> bool {
        self.slug.is_none() && self.body.is_none() && self.author.is_none()
    }
}
