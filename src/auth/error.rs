// Authentication and authorization error types

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::error::{into_error_response, ClassifiedError, ErrorKind};
use crate::store::StoreError;

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    // Registration validation
    #[error("Username, email and password are required")]
    FieldsRequired,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,

    // Login
    #[error("Username and password are required")]
    CredentialsRequired,
    /// Unknown username and wrong password share this variant
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Request gate
    #[error("Authentication token required")]
    MissingToken,
    #[error("Invalid token format. Use: Bearer <token>")]
    MalformedToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,

    // Unexpected
    #[error("Store error in auth: {0}")]
    Store(#[from] StoreError),
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
    #[error("Token generation error: {0}")]
    TokenGeneration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClassifiedError for AuthError {
    fn kind(&self) -> ErrorKind {
        match self {
            AuthError::FieldsRequired
            | AuthError::InvalidEmail
            | AuthError::PasswordTooShort
            | AuthError::UsernameTooShort
            | AuthError::UsernameTaken
            | AuthError::EmailTaken => ErrorKind::BadRequest,
            AuthError::CredentialsRequired
            | AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::MalformedToken => ErrorKind::Unauthorized,
            AuthError::InvalidToken | AuthError::TokenExpired => ErrorKind::Forbidden,
            AuthError::Store(_)
            | AuthError::PasswordHash(_)
            | AuthError::TokenGeneration(_)
            | AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "An internal server error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        into_error_response(&self)
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        self.kind().status_code()
    }
}
