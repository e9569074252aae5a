use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use comment_service::{CommentService, app, db::sqlite};

async fn test_app() -> Router {
    let store = sqlite::init_db("sqlite::memory:").await.unwrap();
    app(CommentService::new(store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn comment(slug: &str, body: &str, author: &str) -> Value {
    json!({"slug": slug, "body": body, "author": author})
}

#[tokio::test]
async fn health_check_reports_working() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Message": "Working fine!", "Error": ""}));
}

#[tokio::test]
async fn post_then_get_round_trips_fields() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/comment/1",
        Some(comment("article-1", "nice post", "alice")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
    assert_eq!(created["slug"], "article-1");
    assert_eq!(created["body"], "nice post");
    assert_eq!(created["author"], "alice");
    assert!(created["deletedAt"].is_null());
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    let (status, fetched) = send(&app, "GET", "/api/comment/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn post_on_collection_ignores_client_ids() {
    let app = test_app().await;
    let mut body = comment("s", "b", "a");
    body["id"] = json!(500);

    let (status, created) = send(&app, "POST", "/api/comments", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn list_all_starts_empty() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/comments", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_filters_by_slug() {
    let app = test_app().await;
    for (slug, author) in [("a", "x"), ("b", "y"), ("a", "z"), ("a", "w")] {
        send(&app, "POST", "/api/comments", Some(comment(slug, "text", author))).await;
    }

    let (status, body) = send(&app, "GET", "/api/comments?slug=a", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3, 4]);

    let (_, all) = send(&app, "GET", "/api/comments", None).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn put_updates_only_given_fields() {
    let app = test_app().await;
    send(&app, "POST", "/api/comments", Some(comment("s", "first", "alice"))).await;
    send(&app, "POST", "/api/comments", Some(comment("s", "second", "bob"))).await;

    let (status, updated) = send(&app, "PUT", "/api/comment/1", Some(json!({"slug": "moved"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["slug"], "moved");
    assert_eq!(updated["body"], "first");
    assert_eq!(updated["author"], "alice");

    let (_, other) = send(&app, "GET", "/api/comment/2", None).await;
    assert_eq!(other["slug"], "s");
    assert_eq!(other["body"], "second");
}

#[tokio::test]
async fn delete_hides_comment_everywhere() {
    let app = test_app().await;
    send(&app, "POST", "/api/comments", Some(comment("s", "b", "a"))).await;

    let (status, body) = send(&app, "DELETE", "/api/comment/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Message": "Successfully deleted comment", "Error": ""}));

    let (status, body) = send(&app, "GET", "/api/comment/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Message"], "Error retrieving comment by ID");
    assert_eq!(body["Error"], "comment 1 not found");

    let (_, all) = send(&app, "GET", "/api/comments", None).await;
    assert_eq!(all, json!([]));
    let (_, by_slug) = send(&app, "GET", "/api/comments?slug=s", None).await;
    assert_eq!(by_slug, json!([]));

    let (status, _) = send(&app, "DELETE", "/api/comment/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_comment_is_404_for_every_verb() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/comment/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PUT", "/api/comment/9", Some(json!({"body": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Message"], "Failed to update comment");

    let (status, body) = send(&app, "DELETE", "/api/comment/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Message"], "Failed to delete comment by ID");
}

#[tokio::test]
async fn unparseable_id_is_400() {
    let app = test_app().await;

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({"body": "x"}))),
        ("DELETE", None),
        ("POST", Some(comment("s", "b", "a"))),
    ] {
        let (status, resp) = send(&app, method, "/api/comment/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(resp["Message"], "Unable to parse UINT for ID");
        assert!(!resp["Error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn malformed_body_is_400() {
    let app = test_app().await;

    let (status, body) = send(&app, "POST", "/api/comments", Some(json!({"slug": 3}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "Failed to decode JSON body");

    let req = Request::builder()
        .method("POST")
        .uri("/api/comments")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (_, all) = send(&app, "GET", "/api/comments", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn unknown_route_uses_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Message"], "Route not found");
}

#[tokio::test]
async fn bad_query_string_uses_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/comments?slug=a&slug=b", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Message"], "Failed to parse query string");
    assert!(!body["Error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn unsupported_method_uses_envelope() {
    let app = test_app().await;

    for uri in ["/api/comment/1", "/api/comments", "/api/health"] {
        let (status, body) = send(&app, "PATCH", uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(body["Message"], "Method not allowed");
    }
}
