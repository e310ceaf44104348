//! Shared configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for upstream desk API calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Backoff ceiling.
    pub max_backoff: Duration,
    pub backoff_multiplier: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), grown exponentially
    /// from `initial_backoff` and capped at `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(30);
        let factor = self.backoff_multiplier.max(1.0).powi(exponent as i32);
        self.initial_backoff.mul_f32(factor).min(self.max_backoff)
    }
}

// =============================================================================
// TESTS
// =============================================================================
