mod common;

use std::time::Duration;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn error_of(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse response");
    body["error"]
        .as_str()
        .expect("Error message missing")
        .to_string()
}

#[tokio::test]
async fn test_login_bootstrap_user() {
    let app = TestApp::spawn().await;

    let token = app.login("admin", "presale").await;

    let claims = app.jwt_handler.verify(&token).expect("Token should verify");
    assert_eq!(claims.username, "admin");
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login")
        .json(&json!({"username": "admin", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user_looks_like_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login")
        .json(&json!({"username": "nobody", "password": "presale"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid credentials");
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login")
        .header("content-type", "application/json")
        .body("{\"username\": \"admin\"")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(response).await, "invalid request");
}

#[tokio::test]
async fn test_login_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login")
        .json(&json!({"username": "admin"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(response).await, "invalid request");
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/register")
        .json(&json!({"username": "alice", "password": "wonderland"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    // The bootstrap admin holds id 1.
    assert_eq!(body["id"], 2);

    let token = app.login("alice", "wonderland").await;
    let claims = app.jwt_handler.verify(&token).expect("Token should verify");
    assert_eq!(claims.sub, 2);
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn test_register_ids_increase() {
    let app = TestApp::spawn().await;

    let mut ids = Vec::new();
    for username in ["u1", "u2", "u3"] {
        let response = app
            .post("/api/register")
            .json(&json!({"username": username, "password": "pw"}))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        ids.push(body["id"].as_i64().expect("id should be a number"));
    }

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/register")
        .json(&json!({"username": "admin", "password": "takeover"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_of(response).await, "user already exists");

    // The original account is untouched.
    app.login("admin", "presale").await;
}

#[tokio::test]
async fn test_gate_rejects_missing_header() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/read")
        .json(&json!({"keys": ["a"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "auth header is missing");
}

#[tokio::test]
async fn test_gate_rejects_wrong_scheme() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/read")
        .header("authorization", "Token abc")
        .json(&json!({"keys": ["a"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid authorization header format");
}

#[tokio::test]
async fn test_gate_rejects_tampered_token() {
    let app = TestApp::spawn().await;

    let token = app.login("admin", "presale").await;
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let other = app
        .jwt_handler
        .issue(99, "mallory", Duration::from_secs(3600))
        .expect("Failed to sign token");
    // Graft another token's payload onto the admin signature.
    parts[1] = other.split('.').nth(1).expect("payload").to_string();

    let response = app
        .post_authenticated("/api/read", &parts.join("."))
        .json(&json!({"keys": ["a"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "token signature is invalid");
}

#[tokio::test]
async fn test_gate_rejects_foreign_secret() {
    let app = TestApp::spawn().await;

    let token = auth::JwtHandler::new(b"some-other-secret-of-sufficient-size")
        .issue(1, "admin", Duration::from_secs(3600))
        .expect("Failed to sign token");

    let response = app
        .post_authenticated("/api/write", &token)
        .json(&json!({"data": {"a": 1}}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "token signature is invalid");
}

#[tokio::test]
async fn test_gate_rejects_expired_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post_authenticated("/api/read", &app.expired_token())
        .json(&json!({"keys": ["a"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid authorization token");
}

#[tokio::test]
async fn test_write_then_read() {
    let app = TestApp::spawn().await;
    let token = app.login("admin", "presale").await;

    let response = app
        .post_authenticated("/api/write", &token)
        .json(&json!({"data": {"a": 1, "b": {"nested": [true, null]}, "c": "text"}}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({"status": "success"}));

    let response = app
        .post_authenticated("/api/read", &token)
        .json(&json!({"keys": ["a", "b", "missing"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({"data": {"a": 1, "b": {"nested": [true, null]}}})
    );
}

#[tokio::test]
async fn test_read_unknown_keys_is_empty() {
    let app = TestApp::spawn().await;
    let token = app.login("admin", "presale").await;

    let response = app
        .post_authenticated("/api/read", &token)
        .json(&json!({"keys": ["nothing", "here"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({"data": {}}));
}

#[tokio::test]
async fn test_rewrite_fails_but_new_keys_land() {
    let app = TestApp::spawn().await;
    let token = app.login("admin", "presale").await;

    app.post_authenticated("/api/write", &token)
        .json(&json!({"data": {"x": "first"}}))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .post_authenticated("/api/write", &token)
        .json(&json!({"data": {"x": "second", "y": "fresh"}}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(response).await, "internal server error");

    let response = app
        .post_authenticated("/api/read", &token)
        .json(&json!({"keys": ["x", "y"]}))
        .send()
        .await
        .expect("Failed to execute request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({"data": {"x": "first", "y": "fresh"}}));
}

#[tokio::test]
async fn test_write_requires_object() {
    let app = TestApp::spawn().await;
    let token = app.login("admin", "presale").await;

    let response = app
        .post_authenticated("/api/write", &token)
        .json(&json!({"data": "not-an-object"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(response).await, "invalid request");
}
