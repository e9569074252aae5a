use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::get,
};
use serde::Deserialize;

use crate::db::CommentStore;
use crate::error::{ApiError, Envelope};
use crate::models::{Comment, CommentUpdate, NewComment};
use crate::service::CommentService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub slug: Option<String>,
}

/// `/comments` is the collection, `/comment/{id}` a single comment.
pub fn comments_routes<S: CommentStore>() -> Router<CommentService<S>> {
    Router::new()
        .route(
            "/comments",
            get(list_comments::<S>).post(create_comment::<S>),
        )
        .route(
            "/comment/{id}",
            get(get_comment::<S>)
                .post(create_comment_at::<S>)
                .put(update_comment::<S>)
                .delete(delete_comment::<S>),
        )
}

async fn list_comments<S: CommentStore>(
    State(service): State<CommentService<S>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::bad_request("Failed to parse query string", rejection.body_text())
    })?;
    let comments = match query.slug.as_deref() {
        Some(slug) => service
            .get_comments_by_slug(slug)
            .await
            .map_err(|e| ApiError::from_service("Failed to retrieve comments by slug", e))?,
        None => service
            .get_all_comments()
            .await
            .map_err(|e| ApiError::from_service("Failed to retrieve all comments", e))?,
    };

    Ok(Json(comments))
}

async fn create_comment<S: CommentStore>(
    State(service): State<CommentService<S>>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let input = decode(payload)?;
    let comment = service
        .post_comment(input)
        .await
        .map_err(|e| ApiError::from_service("Failed to post new comment", e))?;

    Ok(Json(comment))
}

/// Same as [`create_comment`]; the id in the path must parse but is not used.
async fn create_comment_at<S: CommentStore>(
    state: State<CommentService<S>>,
    Path(id): Path<String>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    parse_id(&id)?;
    create_comment(state, payload).await
}

async fn get_comment<S: CommentStore>(
    State(service): State<CommentService<S>>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_id(&id)?;
    let comment = service
        .get_comment(id)
        .await
        .map_err(|e| ApiError::from_service("Error retrieving comment by ID", e))?;

    Ok(Json(comment))
}

async fn update_comment<S: CommentStore>(
    State(service): State<CommentService<S>>,
    Path(id): Path<String>,
    payload: Result<Json<CommentUpdate>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let id = parse_id(&id)?;
    let update = decode(payload)?;
    let comment = service
        .update_comment(id, update)
        .await
        .map_err(|e| ApiError::from_service("Failed to update comment", e))?;

    Ok(Json(comment))
}

async fn delete_comment<S: CommentStore>(
    State(service): State<CommentService<S>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let id = parse_id(&id)?;
    service
        .delete_comment(id)
        .await
        .map_err(|e| ApiError::from_service("Failed to delete comment by ID", e))?;

    Ok(Json(Envelope::message("Successfully deleted comment")))
}

/// Ids are unsigned on the wire and must fit the signed storage column.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    const MESSAGE: &str = "Unable to parse UINT for ID";

    let id = raw
        .parse::<u64>()
        .map_err(|e| ApiError::bad_request(MESSAGE, e))?;
    i64::try_from(id).map_err(|e| ApiError::bad_request(MESSAGE, e))
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request("Failed to decode JSON body", rejection.body_text()))
}
