//! Router configuration for the API.
//!
//! This module provides centralized route registration, the OpenAPI
//! document and middleware configuration for the application.

use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::settings::ServerConfig;
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests with request IDs
/// 3. Error handler - normalizes error bodies and tags them with the request ID
/// 4. CORS, compression and request timeout
///
/// Item routes additionally run the pagination middleware.
///
/// # Routes
/// - `/api/items` - Catalog listings and item creation
/// - `/api/health` - Health check
/// - `/swagger-ui` - API documentation
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = handlers::items::item_routes(state.pagination.clone())
        .merge(handlers::health::health_routes());

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, openapi))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
