//! Integration tests for the HTTP surface.
//!
//! These drive the full router (gate, dispatcher, envelope) against the
//! SQLite adapter with real password hashing and tokens.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use financy_hex::{Services, inbound::HttpServer};
use financy_repo::{Argon2Hasher, JwtTokenService, SqliteRepo};

async fn create_app() -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let tokens = JwtTokenService::new("router-test-secret").unwrap();
    let services = Services::new(repo, Arc::new(Argon2Hasher), Arc::new(tokens));
    HttpServer::new(services).router()
}

fn rpc_request(body: Value, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/rpc")
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn call(app: &Router, operation: &str, args: Value, token: Option<&str>) -> Value {
    let auth = token.map(|t| format!("Bearer {}", t));
    let (status, body) = send(
        app,
        rpc_request(json!({ "operation": operation, "args": args }), auth.as_deref()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Financy backend is running");

    let body = call(&app, "health", Value::Null, None).await;
    assert_eq!(body["data"], "Financy backend is running");
}

#[tokio::test]
async fn test_end_to_end_flow() {
    let app = create_app().await;

    let signup = call(
        &app,
        "signup",
        json!({ "name": "Alice", "email": "Alice@X.com", "password": "secret1" }),
        None,
    )
    .await;
    assert!(signup.get("errors").is_none(), "{signup}");
    assert_eq!(signup["data"]["user"]["email"], "alice@x.com");
    let token = signup["data"]["token"].as_str().unwrap().to_string();

    let me = call(&app, "me", Value::Null, Some(&token)).await;
    assert_eq!(me["data"]["name"], "Alice");
    assert!(me["data"].get("passwordHash").is_none());

    let category = call(&app, "createCategory", json!({ "name": "Food" }), Some(&token)).await;
    let category_id = category["data"]["id"].as_str().unwrap().to_string();

    let tx = call(
        &app,
        "createTransaction",
        json!({
            "title": "Lunch",
            "amount": 20.5,
            "type": "EXPENSE",
            "date": "2026-02-28",
            "categoryId": category_id,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(tx["data"]["category"]["name"], "Food");
    assert_eq!(tx["data"]["type"], "EXPENSE");

    let list = call(&app, "listTransactions", Value::Null, Some(&token)).await;
    let items = list["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Lunch");
    assert_eq!(items[0]["amount"], 20.5);

    let other = call(
        &app,
        "signup",
        json!({ "name": "Bob", "email": "bob@x.com", "password": "secret2" }),
        None,
    )
    .await;
    let other_token = other["data"]["token"].as_str().unwrap().to_string();

    let list = call(&app, "listTransactions", Value::Null, Some(&other_token)).await;
    assert_eq!(list["data"], json!([]));

    let login = call(
        &app,
        "login",
        json!({ "email": "alice@x.com", "password": "secret1" }),
        None,
    )
    .await;
    assert!(login["data"]["token"].is_string());
}

#[tokio::test]
async fn test_invalid_token_is_rejected_with_401() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        rpc_request(json!({ "operation": "listCategories" }), Some("Bearer forged.token.value")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
    assert_eq!(body["errors"][0]["message"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_non_bearer_header_is_anonymous() {
    let app = create_app().await;

    let (status, body) = send(
        &app,
        rpc_request(json!({ "operation": "me" }), Some("Basic dXNlcjpwYXNz")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
    assert_eq!(body["errors"][0]["message"], "Authentication required.");
}

#[tokio::test]
async fn test_malformed_requests_are_bad_input() {
    let app = create_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/rpc")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&body), "BAD_USER_INPUT");

    let body = call(&app, "transferMoney", json!({}), None).await;
    assert_eq!(error_code(&body), "BAD_USER_INPUT");
    assert_eq!(body["errors"][0]["message"], "Unknown operation: transferMoney");

    let body = call(&app, "signup", json!({ "name": "Alice" }), None).await;
    assert_eq!(error_code(&body), "BAD_USER_INPUT");
}

#[tokio::test]
async fn test_validation_error_envelope() {
    let app = create_app().await;

    let body = call(
        &app,
        "signup",
        json!({ "name": "Alice", "email": "alice", "password": "secret1" }),
        None,
    )
    .await;

    assert_eq!(
        body,
        json!({
            "data": null,
            "errors": [{ "message": "Email is invalid.", "extensions": { "code": "BAD_USER_INPUT" } }]
        })
    );
}
