// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
};
use crate::error::ErrorResponse;
use crate::models::ApiResponse;
use crate::AppState;

/// Handler for POST /auth/register
/// Creates an account and returns a session token for it
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse, example = json!({
            "success": true,
            "message": "User registered successfully",
            "data": {
                "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
                "user": {
                    "id": "3f2a9c0e5b8d4e1f9a7c6b5d4e3f2a1b",
                    "username": "alice",
                    "email": "alice@example.com",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "updatedAt": "2024-05-01T10:00:00Z"
                }
            }
        })),
        (status = 400, description = "Invalid fields, or username/email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AuthError> {
    let username = request.username.as_deref().unwrap_or_default();
    let email = request.email.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();
    tracing::debug!("Registration attempt for username: {}", username);

    let response = state.auth.register(username, email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully",
            response,
        )),
    ))
}

/// Handler for POST /auth/login
/// Exchanges a username and password for a session token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Missing fields or invalid credentials", body = ErrorResponse, example = json!({
            "success": false,
            "error_code": "UNAUTHORIZED",
            "message": "Invalid credentials",
            "timestamp": "2024-05-01T10:00:00+00:00"
        })),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AuthError> {
    let username = request.username.as_deref().unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    let response = state.auth.login(username, password).await?;

    Ok(Json(ApiResponse::with_message("Login successful", response)))
}
