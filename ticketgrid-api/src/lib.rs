//! TICKETGRID API - REST Layer
//!
//! This crate exposes the aggregated board over HTTP for the grid
//! dashboard: one polling endpoint, health checks, and optional OpenAPI
//! documentation. All upstream access goes through the desk client; the
//! HTTP layer itself holds no state beyond the shared ticket source.

pub mod config;
pub mod error;
pub mod middleware;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode, FETCH_FAILED_MESSAGE};
pub use routes::create_api_router;
