//! Error types for TICKETGRID operations

use thiserror::Error;

/// Token exchange errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token exchange request failed: {reason}")]
    ExchangeFailed { reason: String },

    #[error("Token endpoint returned status {status}: {message}")]
    ExchangeRejected { status: u16, message: String },

    #[error("Token response did not contain an access token")]
    MalformedGrant,
}

/// Upstream desk API errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Request to {resource} failed with status {status}: {message}")]
    RequestFailed {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("Rate limited on {resource}, retry after {retry_after_ms}ms")]
    RateLimited {
        resource: String,
        retry_after_ms: i64,
    },

    #[error("Transport error on {resource}: {reason}")]
    Transport { resource: String, reason: String },

    #[error("Gave up on {resource} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        resource: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Invalid response from {resource}: {reason}")]
    InvalidResponse { resource: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all TICKETGRID errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for TICKETGRID operations.
pub type GridResult<T> = Result<T, GridError>;

// =============================================================================
// TESTS
// =============================================================================
