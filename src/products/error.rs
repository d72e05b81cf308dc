use axum::response::{IntoResponse, Response};

use crate::error::{into_error_response, ClassifiedError, ErrorKind};
use crate::store::StoreError;

/// Error types for product operations
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    Validation(String),

    #[error("Product not found")]
    NotFound,

    #[error("Store error in products: {0}")]
    Store(#[from] StoreError),
}

impl ProductError {
    pub fn fields_required() -> Self {
        ProductError::Validation("Name and price are required".to_string())
    }

    pub fn invalid_price() -> Self {
        ProductError::Validation("Price must be a positive number".to_string())
    }

    pub fn invalid_stock() -> Self {
        ProductError::Validation("Stock must not be negative".to_string())
    }

    pub fn empty_name() -> Self {
        ProductError::Validation("Name must not be empty".to_string())
    }
}

impl ClassifiedError for ProductError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProductError::Validation(_) => ErrorKind::BadRequest,
            ProductError::NotFound => ErrorKind::NotFound,
            ProductError::Store(_) => ErrorKind::Internal,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ProductError::Store(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        into_error_response(&self)
    }
}
