pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod products;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    login_handler, register_handler, repository::UNIQUE_USER_FIELDS,
    repository::USERS_COLLECTION, require_auth, AuthService, TokenService, UserRepository,
};
use config::AppConfig;
use error::{expose_diagnostics, route_not_found};
use products::{
    create_product_handler, delete_product_handler, get_product_handler, list_products_handler,
    update_product_handler, ProductRepository, ProductService,
};
use store::{postgres::create_pool, MemoryStore, PgDocumentStore, SharedStore};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        products::handlers::list_products_handler,
        products::handlers::get_product_handler,
        products::handlers::create_product_handler,
        products::handlers::update_product_handler,
        products::handlers::delete_product_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::UserResponse,
            products::Product,
            products::CreateProduct,
            products::UpdateProduct,
            models::IdResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Product catalogue endpoints")
    ),
    info(
        title = "Products API",
        version = "1.0.0",
        description = "Product catalogue with token-based authentication"
    )
)]
struct ApiDoc;

/// Registers the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub products: Arc<ProductService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: SharedStore, tokens: TokenService) -> Self {
        let tokens = Arc::new(tokens);

        Self {
            auth: Arc::new(AuthService::new(
                UserRepository::new(store.clone()),
                tokens.clone(),
            )),
            products: Arc::new(ProductService::new(ProductRepository::new(store))),
            tokens,
        }
    }
}

/// In-memory store with the user uniqueness rules applied
pub fn build_memory_store() -> SharedStore {
    let store = UNIQUE_USER_FIELDS
        .iter()
        .fold(MemoryStore::new(), |store, field| {
            store.with_unique_field(USERS_COLLECTION, field)
        });
    Arc::new(store)
}

/// Creates and configures the application router
/// Reads are public; product mutations sit behind the token gate.
/// `diagnostics` echoes internal error detail in responses and must stay off in production.
pub fn create_router(state: AppState, diagnostics: bool) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Protected routes (route_layer only covers routes registered above it)
        .route("/api/products/create", post(create_product_handler))
        .route(
            "/api/products/:id",
            put(update_product_handler).delete(delete_product_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ))
        // Public routes
        .route("/api/products", get(list_products_handler))
        .route("/api/products/:id", get(get_product_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .layer(cors);

    let router = if diagnostics {
        router.layer(middleware::from_fn(expose_diagnostics))
    } else {
        router
    };

    router.with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Products API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");
    tracing::debug!("Loaded configuration: {:?}", config);

    let store: SharedStore = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(database_url)
                .await
                .expect("Failed to create database pool");

            let store = PgDocumentStore::new(pool);
            store
                .migrate()
                .await
                .expect("Failed to run database migrations");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            build_memory_store()
        }
    };

    let diagnostics = config.environment.is_development();
    if diagnostics {
        tracing::warn!("Development environment: internal error details are included in responses");
    }

    let state = AppState::new(store, TokenService::new(config.jwt_secret.as_bytes()));
    let app = create_router(state, diagnostics);

    // Start the Axum server
    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Products API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
