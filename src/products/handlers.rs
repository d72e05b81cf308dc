// HTTP handlers for product endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ErrorResponse;
use crate::models::{ApiResponse, IdResponse};
use crate::products::{CreateProduct, Product, ProductError, UpdateProduct};
use crate::AppState;

/// Handler for GET /api/products
/// Retrieves all products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List of all products", body = Vec<Product>, example = json!({
            "success": true,
            "data": [{
                "id": "7b0c2f4e9a1d4c3b8e6f5a4d3c2b1a09",
                "name": "Desk lamp",
                "price": 24.5,
                "stock": 12,
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }],
            "count": 1
        })),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, ProductError> {
    tracing::debug!("Fetching all products");

    let products = state.products.list().await?;

    tracing::debug!("Retrieved {} products", products.len());
    Ok(Json(ApiResponse::list(products)))
}

/// Handler for GET /api/products/{id}
/// Retrieves a single product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product identifier")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ProductError> {
    let product = state.products.get(&id).await?;
    Ok(Json(ApiResponse::data(product)))
}

/// Handler for POST /api/products/create
/// Creates a new product (authenticated)
#[utoipa::path(
    post,
    path = "/api/products/create",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = IdResponse, example = json!({
            "success": true,
            "message": "Product created successfully",
            "data": { "id": "7b0c2f4e9a1d4c3b8e6f5a4d3c2b1a09" }
        })),
        (status = 400, description = "Invalid input data", body = ErrorResponse, example = json!({
            "success": false,
            "error_code": "BAD_REQUEST",
            "message": "Price must be a positive number",
            "timestamp": "2024-05-01T10:00:00+00:00"
        })),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ApiResponse<IdResponse>>), ProductError> {
    let id = state.products.create(payload).await?;

    tracing::info!("User {} created product {}", user.username, id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Product created successfully",
            IdResponse { id },
        )),
    ))
}

/// Handler for PUT /api/products/{id}
/// Partially updates a product (authenticated)
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product identifier")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = IdResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<ApiResponse<IdResponse>>, ProductError> {
    let id = state.products.update(&id, payload).await?;

    tracing::info!("User {} updated product {}", user.username, id);
    Ok(Json(ApiResponse::with_message(
        "Product updated successfully",
        IdResponse { id },
    )))
}

/// Handler for DELETE /api/products/{id}
/// Deletes a product (authenticated)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product identifier")
    ),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ProductError> {
    state.products.delete(&id).await?;

    tracing::info!("User {} deleted product {}", user.username, id);
    Ok(Json(ApiResponse::message("Product deleted successfully")))
}
