//! Handler tests for the auth endpoints
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They run against the in-memory repository, so no database is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{JwtAuth, JwtConfig};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn test_app() -> Router {
    let jwt = JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-32ch"));
    let service = UserService::new(
        InMemoryUserRepository::new(),
        Arc::new(Argon2Hasher),
        Arc::new(jwt),
    );
    create_auth_router(AuthState { service })
}

fn register_body(email: &str) -> Body {
    Body::from(
        serde_json::to_string(&json!({
            "email": email,
            "password": "Abc123def",
            "full_name": "Test User"
        }))
        .unwrap(),
    )
}

async fn register(app: &Router, email: &str) -> AuthResponse {
    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(register_body(email))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_register_returns_201_with_token() {
    let app = test_app();

    let auth = register(&app, "ada@example.com").await;
    assert_eq!(auth.user.email, "ada@example.com");
    assert_eq!(auth.user.roles, vec!["user".to_string()]);
    assert!(!auth.token.is_empty());
}

#[tokio::test]
async fn test_register_validates_email() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(register_body("not-an-email"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let app = test_app();
    register(&app, "ada@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(register_body("Ada@Example.com"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_returns_token() {
    let app = test_app();
    register(&app, "ada@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": "ada@example.com",
                "password": "Abc123def"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let auth: AuthResponse = json_body(response.into_body()).await;
    assert_eq!(auth.user.email, "ada@example.com");
    assert!(!auth.token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let app = test_app();
    register(&app, "ada@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": "ada@example.com",
                "password": "Wrong123"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_status_with_valid_token() {
    let app = test_app();
    let auth = register(&app, "ada@example.com").await;

    let request = Request::builder()
        .method("GET")
        .uri("/check-status")
        .header("authorization", format!("Bearer {}", auth.token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed: AuthResponse = json_body(response.into_body()).await;
    assert_eq!(refreshed.user.id, auth.user.id);
}

#[tokio::test]
async fn test_check_status_without_token_returns_401() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/check-status")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_status_with_garbage_token_returns_401() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/check-status")
        .header("authorization", "Bearer not.a.real.token")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_status_token_signed_with_other_secret_returns_401() {
    let app = test_app();
    register(&app, "ada@example.com").await;

    let other = JwtAuth::new(&JwtConfig::new("a-completely-different-secret-32chars"));
    let forged = other.create_token(uuid::Uuid::now_v7()).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/check-status")
        .header("authorization", format!("Bearer {}", forged))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
