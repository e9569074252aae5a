//! The comment service: one method per operation exposed over HTTP.

use crate::db::CommentStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Comment, CommentUpdate, NewComment};

#[derive(Debug, Clone)]
pub struct CommentService<S> {
    store: S,
}

impl<S: CommentStore> CommentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_comment(&self, id: i64) -> ServiceResult<Comment> {
        self.store
            .find(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Comments attached to `slug`, oldest first. An unknown slug yields an
    /// empty list.
    pub async fn get_comments_by_slug(&self, slug: &str) -> ServiceResult<Vec<Comment>> {
        Ok(self.store.find_by_slug(slug).await?)
    }

    pub async fn post_comment(&self, input: NewComment) -> ServiceResult<Comment> {
        let comment = self.store.insert(&input).await?;
        tracing::info!(id = comment.id, slug = %comment.slug, "Comment created");
        Ok(comment)
    }

    /// Changes only the fields present in `update`; the write is a single
    /// statement, so concurrent updates of different fields both land.
    pub async fn update_comment(&self, id: i64, update: CommentUpdate) -> ServiceResult<Comment> {
        if update.is_empty() {
            return self.get_comment(id).await;
        }

        if !self.store.update(id, &update).await? {
            return Err(ServiceError::NotFound(id));
        }

        tracing::info!(id, "Comment updated");
        self.get_comment(id).await
    }

    pub async fn delete_comment(&self, id: i64) -> ServiceResult<()> {
        if !self.store.soft_delete(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        tracing::info!(id, "Comment deleted");
        Ok(())
    }

    pub async fn get_all_comments(&self) -> ServiceResult<Vec<Comment>> {
        Ok(self.store.find_all().await?)
    }
}
