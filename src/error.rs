// Error handling module for the Products API
// Provides the error kind table, the shared error body, and HTTP response conversion

use axum::{
    extract::Request,
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

/// Error classes understood by the HTTP boundary
///
/// Every service error reports one of these kinds. The boundary maps a kind
/// to a status code through `status_code`, never by inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid client input (field checks, duplicate username/email)
    BadRequest,
    /// Missing or unusable credentials
    Unauthorized,
    /// A token was presented but cannot be trusted
    Forbidden,
    /// Referenced resource is absent
    NotFound,
    /// Persistence, hashing, or programming failures
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code placed in `error_code`
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Implemented by every error type that can cross the HTTP boundary
pub trait ClassifiedError: Display {
    fn kind(&self) -> ErrorKind;

    /// Message that is safe to send to clients
    fn public_message(&self) -> String;
}

/// Consistent error response structure
///
/// `details` is only ever filled in diagnostic mode (development environment)
/// for internal errors; it is omitted from JSON otherwise.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`, mirrors the success envelope
    pub success: bool,

    /// Machine-readable error code (e.g., "BAD_REQUEST", "FORBIDDEN")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: kind.code().to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Internal error detail carried on the response for `expose_diagnostics`
#[derive(Debug, Clone)]
pub struct Diagnostic {
    body: ErrorResponse,
    detail: String,
}

/// Convert a classified error into an HTTP response
///
/// Logging follows severity: internal errors at error level with full detail,
/// authorization failures at warn level, expected client errors at debug level.
pub fn into_error_response<E: ClassifiedError>(err: &E) -> Response {
    let kind = err.kind();
    let body = ErrorResponse::new(kind, err.public_message());

    match kind {
        ErrorKind::Internal => error!("Internal error: {}", err),
        ErrorKind::Unauthorized | ErrorKind::Forbidden => warn!("Request rejected: {}", err),
        ErrorKind::BadRequest | ErrorKind::NotFound => debug!("Request rejected: {}", err),
    }

    let mut response = (kind.status_code(), Json(body.clone())).into_response();
    if kind == ErrorKind::Internal {
        response.extensions_mut().insert(Diagnostic {
            body,
            detail: err.to_string(),
        });
    }
    response
}

/// Response middleware that echoes internal error detail back to the caller
///
/// Only installed when the service runs in the development environment.
pub async fn expose_diagnostics(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<Diagnostic>().cloned() {
        Some(Diagnostic { mut body, detail }) => {
            body.details = Some(serde_json::Value::String(detail));
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> Response {
    debug!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(ErrorKind::NotFound, "Route not found")),
    )
        .into_response()
}
