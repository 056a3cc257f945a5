//! End-to-end flow through the public API
//!
//! Alice registers, logs in, creates and edits a book; Bob can read it but
//! not change it. Runs against in-memory stores.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({"name": name, "email": email, "password": password}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body
}

async fn login(app: &TestApp, email: &str, password: &str) -> (StatusCode, Value) {
    app.post(
        "/api/v1/auth/login",
        None,
        json!({"email": email, "password": password}),
    )
    .await
}

fn token(body: &Value) -> String {
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_bookshelf_flow() {
    let app = TestApp::new();

    let registered = register(&app, "Alice", "alice@example.com", "pw123").await;
    assert_eq!(registered["token_type"], "Bearer");
    assert_eq!(registered["user"]["email"], "alice@example.com");
    assert!(registered["user"].get("password_hash").is_none());

    let (status, logged_in) = login(&app, "alice@example.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    let alice = token(&logged_in);
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);

    let (status, book) = app
        .post(
            "/api/v1/books",
            Some(&alice),
            json!({"title": "Dune", "description": "Desert planet"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["user_id"], registered["user"]["id"]);
    let book_uri = format!("/api/v1/books/{}", book["id"].as_str().unwrap());

    let (status, updated) = app
        .put(
            &book_uri,
            Some(&alice),
            json!({"title": "Dune (revised)", "description": "Desert planet"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Dune (revised)");

    let bob = token(&register(&app, "Bob", "bob@example.com", "hunter2").await);

    let (status, listed) = app.get("/api/v1/books", Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app
        .put(
            &book_uri,
            Some(&bob),
            json!({"title": "Mine now", "description": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&book_uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&book_uri, Some(&alice)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, listed) = app.get("/api/v1/books", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_denials_are_uniform() {
    let app = TestApp::new();
    register(&app, "Alice", "alice@example.com", "pw123").await;

    let (wrong_password_status, wrong_password) = login(&app, "alice@example.com", "nope").await;
    let (unknown_status, unknown) = login(&app, "ghost@example.com", "pw123").await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    register(&app, "Alice", "Alice@Example.com", "pw123").await;

    let (status, _) = login(&app, "alice@example.COM", "pw123").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = TestApp::new();
    let alice = token(&register(&app, "Alice", "alice@example.com", "pw123").await);

    let (status, _) = app
        .put(
            "/api/v1/user/profile",
            Some(&alice),
            json!({"password": "new-secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login(&app, "alice@example.com", "pw123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "alice@example.com", "new-secret").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_email_conflict() {
    let app = TestApp::new();
    register(&app, "Alice", "alice@example.com", "pw123").await;
    let bob = token(&register(&app, "Bob", "bob@example.com", "pw123").await);

    let (status, body) = app
        .put(
            "/api/v1/user/profile",
            Some(&bob),
            json!({"email": "alice@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_and_login_against_postgres() {
    let app = TestApp::with_database().await;
    app.cleanup().await;

    let email = format!("register_test_{}@example.com", uuid::Uuid::new_v4());
    let registered = register(&app, "Alice", &email, "pw123").await;

    let (status, _) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({"name": "Again", "email": email, "password": "pw123"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, logged_in) = login(&app, &email, "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);

    let alice = token(&logged_in);
    let (status, book) = app
        .post(
            "/api/v1/books",
            Some(&alice),
            json!({"title": "Dune", "description": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .delete(&format!("/api/v1/books/{}", book["id"].as_str().unwrap()), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
