//! OAuth access token cache
//!
//! The desk API hands out short-lived access tokens through a refresh-token
//! grant. The cache holds the current token and its expiry and refreshes on
//! demand. Reads are lock-free in the common case; two tasks racing past an
//! expired token both refresh, which wastes one exchange and nothing else.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use ticketgrid_core::{AuthError, GridResult};

use crate::config::DeskConfig;
use crate::types::TokenResponse;

/// Tokens are considered expired this long before the upstream deadline.
const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Expiry-checked get-or-refresh access token cache.
pub struct TokenCache {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    state: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(config: &DeskConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            state: RwLock::new(None),
        }
    }

    /// Return the cached token while it is valid, refreshing otherwise.
    ///
    /// A failed exchange propagates as `AuthError`; the stale token (if any)
    /// is not reused.
    pub async fn get(&self) -> GridResult<String> {
        {
            let state = self.state.read().await;
            if let Some(token) = state.as_ref() {
                if !token.is_expired(Utc::now()) {
                    return Ok(token.value.clone());
                }
            }
        }
        self.refresh().await
    }

    /// Whether an unexpired token is currently held. Never touches the
    /// network; used by the readiness probe.
    pub async fn holds_valid_token(&self) -> bool {
        let state = self.state.read().await;
        state
            .as_ref()
            .map(|token| !token.is_expired(Utc::now()))
            .unwrap_or(false)
    }

    async fn refresh(&self) -> GridResult<String> {
        let params = [
            ("refresh_token", self.refresh_token.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed {
                reason: format!("HTTP request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::ExchangeRejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let grant: TokenResponse =
            response.json().await.map_err(|e| AuthError::ExchangeFailed {
                reason: format!("Failed to parse token response: {}", e),
            })?;

        let value = grant.access_token.ok_or(AuthError::MalformedGrant)?;
        let lifetime = grant.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        let token = CachedToken {
            value: value.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime as i64),
        };

        *self.state.write().await = Some(token);
        tracing::debug!(expires_in = grant.expires_in, "Refreshed desk access token");
        Ok(value)
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
