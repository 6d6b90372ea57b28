mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register, request, test_app};

#[tokio::test]
async fn register_with_no_fields_lists_exactly_the_missing_required_fields() {
    let app = test_app();

    let (status, body) = request(&app, "POST", "/api/register", None, Some(json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));

    let message = body["message"].as_object().unwrap();
    let fields: Vec<&String> = message.keys().collect();
    assert_eq!(fields, ["name", "email", "password"]);
    assert_eq!(message["name"], json!(["The name field is required."]));
    assert_eq!(message["email"], json!(["The email field is required."]));
    assert_eq!(
        message["password"],
        json!(["The password field is required."])
    );
}

#[tokio::test]
async fn confirm_password_is_required_once_password_is_present() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "name": "John Doe",
            "email": "doe@example.com",
            "password": "demo12345",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = body["message"].as_object().unwrap();
    assert_eq!(message.len(), 1, "only confirm_password should fail: {body}");
    assert_eq!(
        message["confirm_password"],
        json!(["The confirm password field is required."])
    );
}

#[tokio::test]
async fn mismatched_confirm_password_rejected() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "name": "John Doe",
            "email": "doe@example.com",
            "password": "demo12345",
            "confirm_password": "different",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"]["confirm_password"],
        json!(["The confirm password and password must match."])
    );
}

#[tokio::test]
async fn malformed_email_rejected() {
    let app = test_app();

    let (_, body) = request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "name": "John Doe",
            "email": "not-an-email",
            "password": "demo12345",
            "confirm_password": "demo12345",
        })),
    )
    .await;

    assert_eq!(
        body["message"]["email"],
        json!(["The email must be a valid email address."])
    );
}

#[tokio::test]
async fn successful_registration_returns_token_and_name() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "name": "John Doe",
            "email": "doe@example.com",
            "password": "demo12345",
            "confirm_password": "demo12345",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("User created successfully."));
    assert_eq!(body["data"]["name"], json!("John Doe"));
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_name_rejected_on_registration() {
    let app = test_app();
    register(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "name": "admin",
            "email": "second@admin.com",
            "password": "admin123",
            "confirm_password": "admin123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"]["name"],
        json!(["The name has already been taken."])
    );
}

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let app = test_app();
    register(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "email": "admin@admin.com", "password": "admin123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("User signed in"));
    assert_eq!(body["data"]["name"], json!("admin"));
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_failures_are_uniform_unauthorised() {
    let app = test_app();
    register(&app).await;

    for payload in [
        json!({ "email": "admin@admin.com", "password": "wrong" }),
        json!({ "email": "nobody@admin.com", "password": "admin123" }),
        json!({}),
    ] {
        let (status, body) = request(&app, "POST", "/api/login", None, Some(payload)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Unauthorised"));
        assert_eq!(body["data"]["error"], json!("Unauthorised"));
    }
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = test_app();

    // No token at all
    let (status, body) = request(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Unauthorised"));

    // Garbage token
    let (status, body) = request(&app, "GET", "/api/posts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Unauthorised"));
}

#[tokio::test]
async fn issued_token_opens_protected_routes() {
    let app = test_app();
    let token = register(&app).await;

    let (status, body) = request(&app, "GET", "/api/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Posts fetched."));
    assert_eq!(body["data"], json!([]));
}
