//! Desk API HTTP client with pacing and retry
//!
//! All upstream calls funnel through one client so the desk API's rate
//! limit is respected globally: a single-permit semaphore serializes calls
//! and a minimum inter-request interval spaces them out. Transient failures
//! (429, 5xx, transport errors) retry with exponential backoff; everything
//! else propagates immediately.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use ticketgrid_core::{Agent, GridResult, Ticket, TicketFilter, TicketSource, UpstreamError};

use crate::config::DeskConfig;
use crate::token::TokenCache;
use crate::types::{ErrorBody, Page};

/// Desk API client. One instance is shared across all requests.
pub struct DeskClient {
    http: Client,
    config: DeskConfig,
    token: Arc<TokenCache>,
    rate_limiter: Arc<Semaphore>,
    last_request: Arc<AtomicU64>,
    start_time: Instant,
}

impl DeskClient {
    pub fn new(config: DeskConfig) -> Self {
        let token = Arc::new(TokenCache::new(&config));
        Self {
            http: Client::new(),
            token,
            // Upstream calls are serialized, not per-host-parallel.
            rate_limiter: Arc::new(Semaphore::new(1)),
            last_request: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
            config,
        }
    }

    /// The token cache backing this client, for readiness reporting.
    pub fn token_cache(&self) -> Arc<TokenCache> {
        self.token.clone()
    }

    /// Wait out the minimum inter-request interval.
    async fn pace(&self) {
        let now_ms = self.start_time.elapsed().as_millis() as u64;
        let last_ms = self.last_request.load(Ordering::Relaxed);
        let elapsed = now_ms.saturating_sub(last_ms);
        let min_ms = self.config.min_request_interval.as_millis() as u64;

        if elapsed < min_ms {
            tokio::time::sleep(Duration::from_millis(min_ms - elapsed)).await;
        }

        self.last_request
            .store(self.start_time.elapsed().as_millis() as u64, Ordering::Relaxed);
    }

    /// One authenticated GET with pacing and bounded retry.
    ///
    /// 429 and 5xx responses and transport errors retry up to
    /// `retry.max_retries` times with exponential backoff (a Retry-After
    /// header can stretch, never shrink, the wait). Any other error status
    /// propagates immediately.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        path: &str,
        query: &[(String, String)],
    ) -> GridResult<T> {
        let _permit = self.rate_limiter.acquire().await.map_err(|e| {
            UpstreamError::Transport {
                resource: resource.to_string(),
                reason: format!("Rate limiter error: {}", e),
            }
        })?;

        let url = format!("{}/{}", self.config.base_url, path);
        let max_attempts = self.config.retry.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            self.pace().await;

            let token = self.token.get().await?;
            let result = self
                .http
                .get(&url)
                .header(
                    header::AUTHORIZATION,
                    format!("{} {}", self.config.auth_scheme, token),
                )
                .query(query)
                .send()
                .await;

            let mut retry_after = None;
            match result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json().await.map_err(|e| {
                            UpstreamError::InvalidResponse {
                                resource: resource.to_string(),
                                reason: format!("Failed to parse response: {}", e),
                            }
                            .into()
                        });
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        retry_after = parse_retry_after(response.headers());
                        last_error = format!("status {}", status.as_u16());
                        tracing::warn!(
                            resource,
                            status = status.as_u16(),
                            attempt,
                            "Desk API call failed, will retry"
                        );
                    } else {
                        let message = read_error_message(response).await;
                        return Err(UpstreamError::RequestFailed {
                            resource: resource.to_string(),
                            status: status.as_u16(),
                            message,
                        }
                        .into());
                    }
                }
                Err(e) => {
                    last_error = e.to_string();
                    tracing::warn!(
                        resource,
                        error = %e,
                        attempt,
                        "Desk API transport error, will retry"
                    );
                }
            }

            if attempt < max_attempts {
                let backoff = self.config.retry.backoff_for(attempt);
                tokio::time::sleep(backoff.max(retry_after.unwrap_or(Duration::ZERO))).await;
            }
        }

        Err(UpstreamError::RetriesExhausted {
            resource: resource.to_string(),
            attempts: max_attempts,
            last_error,
        }
        .into())
    }

    /// Fetch every record of a list endpoint via offset/limit pagination.
    ///
    /// Pages are requested from offset 1 upward; a page shorter than the
    /// limit is the last one. When the total is an exact multiple of the
    /// limit this costs one extra request that comes back empty.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        resource: &str,
        path: &str,
        extra: &[(String, String)],
    ) -> GridResult<Vec<T>> {
        let limit = self.config.page_size;
        let mut from: u32 = 1;
        let mut all = Vec::new();

        loop {
            let mut query: Vec<(String, String)> = vec![
                ("from".to_string(), from.to_string()),
                ("limit".to_string(), limit.to_string()),
            ];
            query.extend_from_slice(extra);

            let page: Page<T> = self.get_json(resource, path, &query).await?;
            let count = page.data.len();
            all.extend(page.data);

            if (count as u32) < limit {
                break;
            }
            from += limit;
        }

        tracing::debug!(resource, total = all.len(), "Fetched all pages");
        Ok(all)
    }
}

#[async_trait]
impl TicketSource for DeskClient {
    async fn fetch_users(&self) -> GridResult<Vec<Agent>> {
        self.fetch_all("users", "users", &[]).await
    }

    async fn fetch_tickets(&self, filter: &TicketFilter) -> GridResult<Vec<Ticket>> {
        let mut extra = Vec::new();
        if let Some(department_id) = &filter.department_id {
            extra.push(("departmentId".to_string(), department_id.clone()));
        }
        if let Some(agent_id) = &filter.agent_id {
            extra.push(("agentId".to_string(), agent_id.clone()));
        }
        self.fetch_all("tickets", "tickets", &extra).await
    }

    async fn fetch_user(&self, id: &str) -> GridResult<Agent> {
        self.get_json("users", &format!("users/{}", id), &[]).await
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|seconds| *seconds >= 0.0)
        .map(Duration::from_secs_f64)
}

async fn read_error_message(response: reqwest::Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ => text,
    }
}

impl fmt::Debug for DeskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskClient")
            .field("base_url", &self.config.base_url)
            .field("page_size", &self.config.page_size)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
