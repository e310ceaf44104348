//! Assignee Ticket Count Endpoint
//!
//! The dashboard polls this endpoint on an interval. Each request rebuilds
//! the board from scratch: collect users and tickets from the desk API,
//! backfill missing assignees, aggregate, respond. Nothing is cached here
//! except the access token inside the desk client.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use ticketgrid_core::{aggregate, build_board, BoardSnapshot, TicketFilter, TicketSource};
use ticketgrid_desk::collect_board_inputs;

use crate::error::ApiResult;

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct BoardState {
    pub source: Arc<dyn TicketSource>,
}

// ============================================================================
// TYPES
// ============================================================================

/// Query parameters, forwarded verbatim to the desk API's ticket listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    pub department_id: Option<String>,
    pub agent_id: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/assignees-with-ticket-counts - the board payload
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/assignees-with-ticket-counts",
    tag = "Board",
    params(
        ("departmentId" = Option<String>, Query, description = "Restrict tickets to one department"),
        ("agentId" = Option<String>, Query, description = "Restrict tickets to one agent"),
    ),
    responses(
        (status = 200, description = "Per-agent status counts", body = BoardSnapshot),
        (status = 500, description = "Desk API failure", body = crate::error::ApiError),
    ),
))]
pub async fn assignee_ticket_counts(
    State(state): State<BoardState>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Json<BoardSnapshot>> {
    // Empty query values are treated as absent, not forwarded.
    let filter = TicketFilter {
        department_id: query.department_id.filter(|v| !v.is_empty()),
        agent_id: query.agent_id.filter(|v| !v.is_empty()),
    };

    let (tickets, users) = collect_board_inputs(state.source.as_ref(), &filter).await?;
    let outcome = aggregate(&tickets, &users);
    let snapshot = build_board(outcome, &users);

    tracing::debug!(
        members = snapshot.members.len(),
        tickets = tickets.len(),
        unassigned = snapshot.unassigned_ticket_numbers.len(),
        "Assembled board snapshot"
    );

    Ok(Json(snapshot))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the board router.
pub fn create_router(source: Arc<dyn TicketSource>) -> Router {
    Router::new()
        .route("/assignees-with-ticket-counts", get(assignee_ticket_counts))
        .with_state(BoardState { source })
}
