use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fable_api::database::memory::MemoryStore;
use fable_api::{app, AppState};

/// Fresh app over an empty in-memory store
pub fn test_app() -> Router {
    app(AppState::new(Arc::new(MemoryStore::default())))
}

/// Drive one request through the router and decode the JSON envelope
pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::ACCEPT, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

/// Register a default user and return their bearer token
pub async fn register(app: &Router) -> String {
    register_as(app, "admin", "admin@admin.com").await
}

pub async fn register_as(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "admin123",
            "confirm_password": "admin123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Create a category and return its id
pub async fn create_category(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/categories",
        Some(token),
        Some(json!({ "name": name, "content": "seed category" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "category create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

/// Create a post in the given category and return its id
pub async fn create_post(app: &Router, token: &str, category_id: i64, title: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/posts",
        Some(token),
        Some(json!({
            "title": title,
            "description": "seed post",
            "category_id": category_id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "post create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}
