//! TICKETGRID Test Utilities
//!
//! Centralized test infrastructure for the TICKETGRID workspace:
//! - Fixture constructors for tickets and agents
//! - MockTicketSource implementing the core `TicketSource` trait
//!
//! The mock records how it was called (user fetch count, last ticket
//! filter) so tests can assert on the collection path, and supports
//! failure injection for both listings and individual user fetches.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

// Re-export core types for convenience
pub use ticketgrid_core::{
    Agent, AgentKey, GridError, GridResult, StatusCounts, Ticket, TicketFilter, TicketRef,
    TicketSource, UpstreamError,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// An agent with an id and a full name, everything else empty.
pub fn agent(id: &str, full_name: &str) -> Agent {
    Agent {
        id: Some(id.to_string()),
        full_name: Some(full_name.to_string()),
        ..Agent::default()
    }
}

/// A ticket with a numeric id, an optional assignee, and a status.
pub fn ticket(id: i64, assignee_id: Option<&str>, status: &str) -> Ticket {
    Ticket {
        id: Some(TicketRef::Num(id)),
        assignee_id: assignee_id.map(str::to_string),
        status: Some(status.to_string()),
        ..Ticket::default()
    }
}

/// Like [`ticket`], with the escalation flag raised.
pub fn escalated_ticket(id: i64, assignee_id: Option<&str>, status: &str) -> Ticket {
    Ticket {
        is_escalated: Some(true),
        ..ticket(id, assignee_id, status)
    }
}

// ============================================================================
// MOCK TICKET SOURCE
// ============================================================================

/// In-memory `TicketSource` for tests.
#[derive(Debug, Default)]
pub struct MockTicketSource {
    users: Vec<Agent>,
    tickets: Vec<Ticket>,
    /// Users reachable only through per-id fetches, e.g. deactivated agents.
    directory: HashMap<String, Agent>,
    failing_users: HashSet<String>,
    fail_users_listing: bool,
    fail_tickets_listing: bool,
    user_fetches: AtomicUsize,
    last_filter: Mutex<Option<TicketFilter>>,
}

impl MockTicketSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, users: Vec<Agent>) -> Self {
        self.users = users;
        self
    }

    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    /// Make `user` fetchable by id without appearing in the listing.
    pub fn with_directory_user(mut self, user: Agent) -> Self {
        if let Some(id) = user.id.clone() {
            self.directory.insert(id, user);
        }
        self
    }

    /// Make per-id fetches of `id` fail.
    pub fn with_failing_user(mut self, id: &str) -> Self {
        self.failing_users.insert(id.to_string());
        self
    }

    /// Make the user listing fail.
    pub fn with_users_error(mut self) -> Self {
        self.fail_users_listing = true;
        self
    }

    /// Make the ticket listing fail.
    pub fn with_tickets_error(mut self) -> Self {
        self.fail_tickets_listing = true;
        self
    }

    /// Number of per-id user fetches performed so far.
    pub fn user_fetch_count(&self) -> usize {
        self.user_fetches.load(Ordering::Relaxed)
    }

    /// The filter passed to the most recent ticket listing.
    pub fn last_filter(&self) -> Option<TicketFilter> {
        self.last_filter.lock().unwrap().clone()
    }

    fn listing_error(resource: &str) -> GridError {
        UpstreamError::RetriesExhausted {
            resource: resource.to_string(),
            attempts: 5,
            last_error: "status 503".to_string(),
        }
        .into()
    }
}

#[async_trait]
impl TicketSource for MockTicketSource {
    async fn fetch_users(&self) -> GridResult<Vec<Agent>> {
        if self.fail_users_listing {
            return Err(Self::listing_error("users"));
        }
        Ok(self.users.clone())
    }

    async fn fetch_tickets(&self, filter: &TicketFilter) -> GridResult<Vec<Ticket>> {
        *self.last_filter.lock().unwrap() = Some(filter.clone());
        if self.fail_tickets_listing {
            return Err(Self::listing_error("tickets"));
        }
        Ok(self.tickets.clone())
    }

    async fn fetch_user(&self, id: &str) -> GridResult<Agent> {
        self.user_fetches.fetch_add(1, Ordering::Relaxed);
        if self.failing_users.contains(id) {
            return Err(UpstreamError::RequestFailed {
                resource: "users".to_string(),
                status: 404,
                message: format!("No user with id {}", id),
            }
            .into());
        }
        self.directory.get(id).cloned().ok_or_else(|| {
            UpstreamError::RequestFailed {
                resource: "users".to_string(),
                status: 404,
                message: format!("No user with id {}", id),
            }
            .into()
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
