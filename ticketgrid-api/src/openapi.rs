//! OpenAPI Documentation
//!
//! Aggregates route annotations and schemas into one document served at
//! /openapi.json (and browsable at /swagger-ui with the swagger-ui
//! feature).

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use ticketgrid_core::{BoardMember, BoardSnapshot, StatusCounts, TicketRef};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TICKETGRID API",
        description = "Per-agent helpdesk ticket status counts for the grid dashboard",
    ),
    paths(
        crate::routes::board::assignee_ticket_counts,
        crate::routes::health::ping,
        crate::routes::health::liveness,
        crate::routes::health::readiness,
    ),
    components(schemas(
        BoardSnapshot,
        BoardMember,
        StatusCounts,
        TicketRef,
        ApiError,
        ErrorCode,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
    )),
    tags(
        (name = "Board", description = "Aggregated ticket counts"),
        (name = "Health", description = "Service health checks"),
    )
)]
pub struct ApiDoc;
