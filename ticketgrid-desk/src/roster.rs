//! Board input collection
//!
//! The user listing only returns active agents, but tickets can still point
//! at deactivated or cross-department assignees. Before aggregation, any
//! assignee id the listing did not cover is fetched individually; ids that
//! cannot be fetched are logged and skipped so one broken reference never
//! takes the board down.

use std::collections::HashSet;

use ticketgrid_core::{Agent, AgentKey, GridResult, Ticket, TicketFilter, TicketSource};

/// Fetch tickets and the full user roster, backfilling users that tickets
/// reference but the listing omitted.
pub async fn collect_board_inputs(
    source: &dyn TicketSource,
    filter: &TicketFilter,
) -> GridResult<(Vec<Ticket>, Vec<Agent>)> {
    let mut users = source.fetch_users().await?;
    let tickets = source.fetch_tickets(filter).await?;

    let known: HashSet<String> = users.iter().filter_map(|u| u.id.clone()).collect();

    let mut missing: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for ticket in &tickets {
        if let AgentKey::Agent(id) = AgentKey::resolve(ticket.assignee_id.as_deref()) {
            if !known.contains(&id) && seen.insert(id.clone()) {
                missing.push(id);
            }
        }
    }

    if !missing.is_empty() {
        tracing::info!(count = missing.len(), "Backfilling users missing from roster");
    }

    for id in missing {
        match source.fetch_user(&id).await {
            Ok(user) => users.push(user),
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Could not fetch user, skipping");
            }
        }
    }

    Ok((tickets, users))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ticketgrid_test_utils::{agent, ticket, MockTicketSource};

    #[tokio::test]
    async fn test_no_backfill_when_roster_covers_assignees() {
        let source = MockTicketSource::new()
            .with_users(vec![agent("u1", "One")])
            .with_tickets(vec![ticket(1, Some("u1"), "Open")]);

        let (tickets, users) = collect_board_inputs(&source, &TicketFilter::default())
            .await
            .unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(users.len(), 1);
        assert_eq!(source.user_fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_assignees_are_backfilled_once() {
        let source = MockTicketSource::new()
            .with_users(vec![agent("u1", "One")])
            .with_tickets(vec![
                ticket(1, Some("ghost"), "Open"),
                ticket(2, Some("ghost"), "Closed"),
                ticket(3, Some("u1"), "Open"),
            ])
            .with_directory_user(agent("ghost", "Former Agent"));

        let (_, users) = collect_board_inputs(&source, &TicketFilter::default())
            .await
            .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id.as_deref(), Some("ghost"));
        assert_eq!(source.user_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_sentinel_assignees_are_not_backfilled() {
        let source = MockTicketSource::new().with_tickets(vec![
            ticket(1, None, "Open"),
            ticket(2, Some("none"), "Open"),
            ticket(3, Some("NULL"), "Open"),
        ]);

        let (_, users) = collect_board_inputs(&source, &TicketFilter::default())
            .await
            .unwrap();
        assert!(users.is_empty());
        assert_eq!(source.user_fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_backfill_is_skipped_not_fatal() {
        let source = MockTicketSource::new()
            .with_tickets(vec![ticket(1, Some("gone"), "Open")])
            .with_failing_user("gone");

        let (tickets, users) = collect_board_inputs(&source, &TicketFilter::default())
            .await
            .unwrap();
        assert_eq!(tickets.len(), 1);
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let source = MockTicketSource::new().with_tickets_error();
        let result = collect_board_inputs(&source, &TicketFilter::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_filter_is_forwarded() {
        let source = MockTicketSource::new();
        let filter = TicketFilter {
            department_id: Some("d7".to_string()),
            agent_id: None,
        };
        collect_board_inputs(&source, &filter).await.unwrap();
        assert_eq!(source.last_filter(), Some(filter));
    }
}
