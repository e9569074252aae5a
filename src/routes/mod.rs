pub mod comments;
pub mod health;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::db::CommentStore;
use crate::service::CommentService;

pub use comments::comments_routes;
pub use health::health_check;

/// Builds the full application router around `service`.
pub fn app<S: CommentStore>(service: CommentService<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/api", comments_routes::<S>())
        .route("/api/health", get(health_check));

    Router::new()
        .merge(api_routes)
        .fallback(health::not_found)
        .method_not_allowed_fallback(health::method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(service)
}
