//! Desk API client configuration
//!
//! Configuration is loaded from environment variables with defaults for
//! everything except the OAuth credentials, which have no sensible default
//! and fail fast when absent.

use std::fmt;
use std::time::Duration;

use ticketgrid_core::{ConfigError, GridResult, RetryConfig};

/// Connection and pacing settings for the upstream desk API.
#[derive(Clone, PartialEq)]
pub struct DeskConfig {
    /// Base URL of the desk REST API.
    pub base_url: String,

    /// OAuth token endpoint for the refresh-token grant.
    pub token_url: String,

    /// Authorization header scheme, e.g. "Zoho-oauthtoken" or "Bearer".
    pub auth_scheme: String,

    /// OAuth client credentials for the refresh-token grant.
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,

    /// Records requested per page.
    pub page_size: u32,

    /// Minimum spacing between upstream calls.
    pub min_request_interval: Duration,

    /// Retry policy for 429/5xx responses and transport errors.
    pub retry: RetryConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            base_url: "https://desk.zoho.com/api/v1".to_string(),
            token_url: "https://accounts.zoho.com/oauth/v2/token".to_string(),
            auth_scheme: "Zoho-oauthtoken".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            page_size: 100,
            min_request_interval: Duration::from_millis(1100),
            retry: RetryConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Create DeskConfig from environment variables.
    ///
    /// Environment variables:
    /// - `DESK_CLIENT_ID`, `DESK_CLIENT_SECRET`, `DESK_REFRESH_TOKEN`: OAuth
    ///   credentials (required)
    /// - `DESK_BASE_URL`: API base URL (default: Zoho Desk v1)
    /// - `DESK_TOKEN_URL`: OAuth token endpoint (default: Zoho accounts)
    /// - `DESK_AUTH_SCHEME`: Authorization header scheme (default: Zoho-oauthtoken)
    /// - `DESK_PAGE_SIZE`: records per page (default: 100)
    /// - `DESK_MIN_REQUEST_INTERVAL_MS`: call spacing (default: 1100)
    /// - `DESK_MAX_RETRIES`: retries on transient failures (default: 4)
    pub fn from_env() -> GridResult<Self> {
        let defaults = DeskConfig::default();

        let config = Self {
            base_url: env_or("DESK_BASE_URL", &defaults.base_url),
            token_url: env_or("DESK_TOKEN_URL", &defaults.token_url),
            auth_scheme: env_or("DESK_AUTH_SCHEME", &defaults.auth_scheme),
            client_id: require_env("DESK_CLIENT_ID")?,
            client_secret: require_env("DESK_CLIENT_SECRET")?,
            refresh_token: require_env("DESK_REFRESH_TOKEN")?,
            page_size: env_parsed("DESK_PAGE_SIZE", defaults.page_size),
            min_request_interval: Duration::from_millis(env_parsed(
                "DESK_MIN_REQUEST_INTERVAL_MS",
                defaults.min_request_interval.as_millis() as u64,
            )),
            retry: RetryConfig {
                max_retries: env_parsed("DESK_MAX_RETRIES", defaults.retry.max_retries),
                ..defaults.retry
            },
        };

        config.validate()
    }

    /// Reject configurations that cannot work.
    pub fn validate(self) -> GridResult<Self> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DESK_PAGE_SIZE".to_string(),
                value: "0".to_string(),
                reason: "page size must be positive".to_string(),
            }
            .into());
        }
        Ok(self)
    }
}

/// Credentials stay out of debug output.
impl fmt::Debug for DeskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskConfig")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("auth_scheme", &self.auth_scheme)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("page_size", &self.page_size)
            .field("min_request_interval", &self.min_request_interval)
            .field("retry", &self.retry)
            .finish()
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn require_env(name: &str) -> GridResult<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ConfigError::MissingRequired {
                field: name.to_string(),
            }
            .into()
        })
}

// =============================================================================
// TESTS
// =============================================================================
