use axum::Json;

use crate::error::{ApiError, Envelope};

pub async fn health_check() -> Json<Envelope> {
    Json(Envelope::message("Working fine!"))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound {
        message: "Route not found",
        detail: String::new(),
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed {
        message: "Method not allowed",
        detail: String::new(),
    }
}
