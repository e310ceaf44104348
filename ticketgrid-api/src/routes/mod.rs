//! REST API Routes Module
//!
//! Includes:
//! - The board endpoint the dashboard polls
//! - Health check endpoints (Kubernetes-compatible)
//! - OpenAPI spec and Swagger UI (feature-gated)
//! - CORS support for the browser-based dashboard

pub mod board;
pub mod health;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use ticketgrid_core::TicketSource;
use ticketgrid_desk::TokenCache;

use crate::config::ApiConfig;
use crate::middleware::observability_middleware;

// Re-export route creation functions for convenience
pub use board::create_router as board_router;
pub use health::create_router as health_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint. With the swagger-ui feature the
/// Swagger router serves the spec itself, so this handler only exists for
/// spec-without-UI builds.
#[cfg(all(feature = "openapi", not(feature = "swagger-ui")))]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Build the complete API router.
///
/// `token` feeds the readiness probe; pass `None` when the caller has no
/// token cache (tests drive the router with a mock source).
pub fn create_api_router(
    source: Arc<dyn TicketSource>,
    token: Option<Arc<TokenCache>>,
    api_config: &ApiConfig,
) -> Router {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/api", board::create_router(source))
        // Health checks (no auth required)
        .nest("/health", health::create_router(token));

    // OpenAPI spec
    #[cfg(all(feature = "openapi", not(feature = "swagger-ui")))]
    {
        router = router.route("/openapi.json", axum::routing::get(openapi_json));
    }

    // Swagger UI serves /openapi.json itself alongside the browser UI
    #[cfg(feature = "swagger-ui")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/openapi.json", crate::openapi::ApiDoc::openapi()),
        );
    }

    let cors = build_cors_layer(api_config);

    router.layer(from_fn(observability_middleware)).layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}
