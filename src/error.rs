//! Error types shared by the service and the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for comment service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by [`crate::service::CommentService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("comment {0} not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// The JSON body used for status messages and failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Error")]
    pub error: String,
}

impl Envelope {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: String::new(),
        }
    }
}

/// An error that is rendered as an [`Envelope`] with a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}: {detail}")]
    BadRequest { message: &'static str, detail: String },

    #[error("{message}: {detail}")]
    NotFound { message: &'static str, detail: String },

    #[error("{message}: {detail}")]
    MethodNotAllowed { message: &'static str, detail: String },

    #[error("{message}: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl ApiError {
    pub fn bad_request(message: &'static str, detail: impl ToString) -> Self {
        Self::BadRequest {
            message,
            detail: detail.to_string(),
        }
    }

    /// Maps a service failure onto the HTTP error classes, tagging it with
    /// the operation-specific `message`.
    pub fn from_service(message: &'static str, error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(_) => Self::NotFound {
                message,
                detail: error.to_string(),
            },
            ServiceError::Storage(ref source) => {
                tracing::error!(error = %source, "{message}");
                Self::Internal {
                    message,
                    detail: error.to_string(),
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (Self::BadRequest { message, detail }
        | Self::NotFound { message, detail }
        | Self::MethodNotAllowed { message, detail }
        | Self::Internal { message, detail }) = self;

        (
            status,
            Json(Envelope {
                message: message.to_string(),
                error: detail,
            }),
        )
            .into_response()
    }
}
