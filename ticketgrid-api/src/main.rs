//! TICKETGRID API Server Entry Point
//!
//! Bootstraps configuration, builds the desk API client, and starts the
//! Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use ticketgrid_api::{create_api_router, ApiConfig, ApiError, ApiResult};
use ticketgrid_desk::{DeskClient, DeskConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let desk_config = DeskConfig::from_env()?;
    let api_config = ApiConfig::from_env();

    let client = Arc::new(DeskClient::new(desk_config));
    let token = client.token_cache();

    let app: Router = create_api_router(client, Some(token), &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting TICKETGRID API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("GRID_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("GRID_API_PORT").ok())
        .unwrap_or_else(|| "5000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
