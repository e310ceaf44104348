//! End-to-end route tests for the TICKETGRID API
//!
//! Drives the assembled router with a mock ticket source and asserts on
//! the JSON the dashboard actually consumes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use ticketgrid_api::{create_api_router, ApiConfig, FETCH_FAILED_MESSAGE};
use ticketgrid_test_utils::{
    agent, escalated_ticket, ticket, MockTicketSource, TicketFilter, TicketSource,
};

fn router_with(source: Arc<MockTicketSource>) -> axum::Router {
    create_api_router(source as Arc<dyn TicketSource>, None, &ApiConfig::default())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn board_endpoint_returns_members_and_unassigned_numbers() {
    let source = Arc::new(
        MockTicketSource::new()
            .with_users(vec![agent("u1", "Ada Lovelace"), agent("u2", "Grace Hopper")])
            .with_tickets(vec![
                ticket(1, Some("u1"), "Open"),
                ticket(2, Some("u1"), "Closed"),
                escalated_ticket(3, Some("u2"), "Open"),
                ticket(4, None, "Open"),
                ticket(5, None, "Closed"), // dropped from counters
            ]),
    );

    let (status, body) = get_json(
        router_with(source),
        "/api/assignees-with-ticket-counts",
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 3);

    // Roster order, synthetic Unassigned row last.
    assert_eq!(members[0]["id"], "u1");
    assert_eq!(members[0]["name"], "Ada Lovelace");
    assert_eq!(members[0]["tickets"]["open"], 1);
    assert_eq!(members[0]["tickets"]["closed"], 1);

    // Escalation flag wins over the Open status.
    assert_eq!(members[1]["id"], "u2");
    assert_eq!(members[1]["tickets"]["escalated"], 1);
    assert_eq!(members[1]["tickets"]["open"], 0);

    // The ownerless bucket counts the open ticket; the closed one is
    // dropped from counters but still listed by number.
    assert_eq!(members[2]["id"], "unassigned");
    assert_eq!(members[2]["name"], "Unassigned");
    assert_eq!(members[2]["tickets"]["unassigned"], 1);
    assert_eq!(members[2]["latestUnassignedTicketId"], 5);
    assert_eq!(body["unassignedTicketNumbers"], serde_json::json!([4, 5]));
}

#[tokio::test]
async fn board_endpoint_forwards_filters_upstream() {
    let source = Arc::new(MockTicketSource::new());
    let app = router_with(source.clone());

    let (status, _) = get_json(
        app,
        "/api/assignees-with-ticket-counts?departmentId=d1&agentId=a7",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        source.last_filter(),
        Some(TicketFilter {
            department_id: Some("d1".to_string()),
            agent_id: Some("a7".to_string()),
        })
    );
}

#[tokio::test]
async fn upstream_failure_maps_to_fixed_500_body() {
    let source = Arc::new(MockTicketSource::new().with_tickets_error());

    let (status, body) = get_json(
        router_with(source),
        "/api/assignees-with-ticket-counts",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], FETCH_FAILED_MESSAGE);
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn users_listing_failure_also_maps_to_500() {
    let source = Arc::new(MockTicketSource::new().with_users_error());

    let (status, body) = get_json(
        router_with(source),
        "/api/assignees-with-ticket-counts",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn health_ping_responds() {
    let app = router_with(Arc::new(MockTicketSource::new()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"pong");
}

#[tokio::test]
async fn health_ready_reports_degraded_without_token_cache() {
    let app = router_with(Arc::new(MockTicketSource::new()));
    let (status, body) = get_json(app, "/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["details"]["token_cache"]["status"], "degraded");
}
