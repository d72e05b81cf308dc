// HTTP tests for the Products API
// Exercises the full router (auth gate, envelopes, error bodies) against the in-memory store

use super::*;
use crate::auth::token::Identity;
use crate::store::{Document, DocumentStore, Fields, StoreError};
use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

const TEST_SECRET: &[u8] = b"test_secret_key_for_testing_purposes";

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_server(diagnostics: bool) -> TestServer {
    let state = AppState::new(build_memory_store(), TokenService::new(TEST_SECRET));
    TestServer::new(create_router(state, diagnostics)).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn register(server: &TestServer, username: &str, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/auth/register")
        .json(&json!({ "username": username, "email": email, "password": password }))
        .await
}

/// Registers `alice` and returns her token
async fn register_alice(server: &TestServer) -> String {
    let response = register(server, "alice", "alice@example.com", "secret1").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_product(server: &TestServer, token: &str, payload: Value) -> axum_test::TestResponse {
    server
        .post("/api/products/create")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&payload)
        .await
}

fn assert_error(response: &axum_test::TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status, "body: {}", response.text());
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
    assert!(body.get("timestamp").is_some());
}

// ============================================================================
// Registration (POST /auth/register)
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let server = create_test_server(false);

    let response = register(&server, "alice", "alice@example.com", "secret1").await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("createdAt").is_some());

    let token = body["data"]["token"].as_str().unwrap();
    let claims = TokenService::new(TEST_SECRET).verify(token).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.id, body["data"]["user"]["id"]);
}

#[tokio::test]
async fn test_register_validation_messages() {
    let server = create_test_server(false);

    let cases = [
        (json!({ "username": "alice", "email": "alice@example.com" }), "Username, email and password are required"),
        (json!({ "username": "alice", "email": "alice-at-example", "password": "secret1" }), "Invalid email"),
        (json!({ "username": "alice", "email": "alice@example.com", "password": "12345" }), "Password must be at least 6 characters long"),
        (json!({ "username": "al", "email": "al@example.com", "password": "secret1" }), "Username must be at least 3 characters long"),
    ];

    for (payload, message) in cases {
        let response = server.post("/auth/register").json(&payload).await;
        assert_error(&response, StatusCode::BAD_REQUEST, message);
    }
}

#[tokio::test]
async fn test_register_null_fields_are_treated_as_missing() {
    let server = create_test_server(false);

    let cases = [
        json!({ "username": "alice", "email": null, "password": "secret1" }),
        json!({ "username": null, "email": "alice@example.com", "password": "secret1" }),
        json!({ "username": "alice", "email": "alice@example.com", "password": null }),
    ];

    for payload in cases {
        let response = server.post("/auth/register").json(&payload).await;
        assert_error(&response, StatusCode::BAD_REQUEST, "Username, email and password are required");
    }
}

#[tokio::test]
async fn test_register_duplicates() {
    let server = create_test_server(false);
    register_alice(&server).await;

    let response = register(&server, "alice", "other@example.com", "secret1").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Username is already taken");

    let response = register(&server, "bob", "alice@example.com", "secret1").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Email is already registered");
}

// ============================================================================
// Login (POST /auth/login)
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = create_test_server(false);
    register_alice(&server).await;

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert!(TokenService::new(TEST_SECRET)
        .verify(body["data"]["token"].as_str().unwrap())
        .is_ok());
}

#[tokio::test]
async fn test_login_does_not_reveal_which_part_failed() {
    let server = create_test_server(false);
    register_alice(&server).await;

    let wrong_password = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "not-the-password" }))
        .await;
    let unknown_user = server
        .post("/auth/login")
        .json(&json!({ "username": "nobody", "password": "secret1" }))
        .await;

    assert_error(&wrong_password, StatusCode::UNAUTHORIZED, "Invalid credentials");
    assert_error(&unknown_user, StatusCode::UNAUTHORIZED, "Invalid credentials");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let server = create_test_server(false);

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "alice" }))
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Username and password are required");
}

#[tokio::test]
async fn test_login_null_fields_are_treated_as_missing() {
    let server = create_test_server(false);
    register_alice(&server).await;

    let cases = [
        json!({ "username": null, "password": "secret1" }),
        json!({ "username": "alice", "password": null }),
    ];

    for payload in cases {
        let response = server.post("/auth/login").json(&payload).await;
        assert_error(&response, StatusCode::UNAUTHORIZED, "Username and password are required");
    }
}

// ============================================================================
// Public product reads
// ============================================================================

#[tokio::test]
async fn test_list_products_is_public() {
    let server = create_test_server(false);

    let response = server.get("/api/products").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": true, "data": [], "count": 0 }));
}

#[tokio::test]
async fn test_get_unknown_product() {
    let server = create_test_server(false);

    let response = server.get("/api/products/does-not-exist").await;

    assert_error(&response, StatusCode::NOT_FOUND, "Product not found");
}

// ============================================================================
// Product lifecycle (authenticated)
// ============================================================================

#[tokio::test]
async fn test_product_crud_flow() {
    let server = create_test_server(false);
    let token = register_alice(&server).await;

    // Create
    let response = create_product(
        &server,
        &token,
        json!({ "name": "Lamp", "price": 24.5, "stock": 4, "description": "Desk lamp" }),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Product created successfully");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Read back without a token
    let response = server.get(&format!("/api/products/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "Lamp");
    assert_eq!(body["data"]["price"], 24.5);
    assert_eq!(body["data"]["stock"], 4);

    // Partial update
    let response = server
        .put(&format!("/api/products/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "price": 19.99 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["id"], id.as_str());

    let body: Value = server.get("/api/products").await.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["price"], 19.99);
    assert_eq!(body["data"][0]["name"], "Lamp");

    // Delete
    let response = server
        .delete(&format!("/api/products/{}", id))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": true, "message": "Product deleted successfully" }));

    let response = server.get(&format!("/api/products/{}", id)).await;
    assert_error(&response, StatusCode::NOT_FOUND, "Product not found");
}

#[tokio::test]
async fn test_create_product_validation() {
    let server = create_test_server(false);
    let token = register_alice(&server).await;

    let response = create_product(&server, &token, json!({ "price": 10.0 })).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Name and price are required");

    let response = create_product(&server, &token, json!({ "name": "Lamp", "price": -3.0 })).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Price must be a positive number");
}

#[tokio::test]
async fn test_update_and_delete_unknown_product() {
    let server = create_test_server(false);
    let token = register_alice(&server).await;

    let response = server
        .put("/api/products/missing")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "price": 5.0 }))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Product not found");

    let response = server
        .delete("/api/products/missing")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Product not found");
}

// ============================================================================
// Auth gate on protected routes
// ============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = create_test_server(false);
    let payload = json!({ "name": "Lamp", "price": 1.0 });

    let response = server.post("/api/products/create").json(&payload).await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication token required");

    let response = server.put("/api/products/any").json(&payload).await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication token required");

    let response = server.delete("/api/products/any").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication token required");
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let server = create_test_server(false);
    let identity = Identity {
        id: "u-1".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
    };
    let expired = TokenService::new(TEST_SECRET)
        .issue_at(&identity, Utc::now() - Duration::hours(25))
        .unwrap();
    let foreign = TokenService::new(b"some-other-secret").issue(&identity).unwrap();

    let cases = [
        (HeaderValue::from_static("Token xyz"), StatusCode::UNAUTHORIZED, "Invalid token format. Use: Bearer <token>"),
        (HeaderValue::from_static("Bearer a b"), StatusCode::UNAUTHORIZED, "Invalid token format. Use: Bearer <token>"),
        (bearer("garbage"), StatusCode::FORBIDDEN, "Invalid token"),
        (bearer(&foreign), StatusCode::FORBIDDEN, "Invalid token"),
        (bearer(&expired), StatusCode::FORBIDDEN, "Token expired"),
    ];

    for (value, status, message) in cases {
        let response = server
            .post("/api/products/create")
            .add_header(header::AUTHORIZATION, value)
            .json(&json!({ "name": "Lamp", "price": 1.0 }))
            .await;
        assert_error(&response, status, message);
    }

    // nothing was written
    let body: Value = server.get("/api/products").await.json();
    assert_eq!(body["count"], 0);
}

// ============================================================================
// Routing and error bodies
// ============================================================================

#[tokio::test]
async fn test_unknown_route() {
    let server = create_test_server(false);

    let response = server.get("/api/nothing-here").await;

    assert_error(&response, StatusCode::NOT_FOUND, "Route not found");
    let body: Value = response.json();
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = create_test_server(false);

    let response = server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"].get("/auth/register").is_some());
    assert!(body["paths"].get("/api/products/{id}").is_some());
}

/// Store that fails every call, to drive the internal error path
struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self, _: &str) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_field(&self, _: &str, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _: &str, _: Fields) -> Result<Document, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _: &str, _: &str, _: Fields) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _: &str, _: &str) -> Result<bool, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

fn failing_server(diagnostics: bool) -> TestServer {
    let state = AppState::new(Arc::new(FailingStore), TokenService::new(TEST_SECRET));
    TestServer::new(create_router(state, diagnostics)).unwrap()
}

#[tokio::test]
async fn test_internal_errors_are_generic_in_production() {
    let server = failing_server(false);

    let response = server.get("/api/products").await;

    assert_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal server error occurred",
    );
    let body: Value = response.json();
    assert_eq!(body["error_code"], "INTERNAL_ERROR");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_internal_errors_include_details_in_development() {
    let server = failing_server(true);

    let response = register(&server, "alice", "alice@example.com", "secret1").await;

    assert_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal server error occurred",
    );
    let body: Value = response.json();
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("pool timed out"), "details: {}", details);
}

#[tokio::test]
async fn test_client_errors_never_carry_details() {
    let server = create_test_server(true);

    let response = server.get("/api/products/missing").await;

    assert_error(&response, StatusCode::NOT_FOUND, "Product not found");
    let body: Value = response.json();
    assert!(body.get("details").is_none());
}
