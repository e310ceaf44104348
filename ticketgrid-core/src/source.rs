//! Ticket source abstraction
//!
//! The trait lives here rather than in the desk client crate so that
//! ticketgrid-test-utils can provide a mock without depending on any I/O
//! code.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GridResult;
use crate::ticket::{Agent, Ticket};

/// Optional upstream-side filters for ticket listing. Both values pass
/// through to the desk API untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    pub department_id: Option<String>,
    pub agent_id: Option<String>,
}

impl TicketFilter {
    pub fn is_empty(&self) -> bool {
        self.department_id.is_none() && self.agent_id.is_none()
    }
}

/// Read access to the upstream desk API.
///
/// Implementations must be thread-safe (Send + Sync). The production
/// implementation is `ticketgrid_desk::DeskClient`; tests use
/// `ticketgrid_test_utils::MockTicketSource`.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Fetch every user visible to the integration, across all pages.
    async fn fetch_users(&self) -> GridResult<Vec<Agent>>;

    /// Fetch every ticket matching `filter`, across all pages.
    async fn fetch_tickets(&self, filter: &TicketFilter) -> GridResult<Vec<Ticket>>;

    /// Fetch a single user by id.
    async fn fetch_user(&self, id: &str) -> GridResult<Agent>;
}
