//! Per-agent ticket tallies
//!
//! The aggregation pass walks the full ticket list once and produces one
//! counter record per agent plus a shared bucket for tickets nobody owns.
//! Routing rules are evaluated in a fixed priority order and every quirk of
//! that order is a behavioral contract of the dashboard - see the routing
//! match in [`aggregate`] and the tests pinning it down.
//!
//! This module never fails: malformed records degrade to defaults and are
//! counted the same as well-formed ones.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::status::{normalize_status, CanonicalStatus};
use crate::ticket::{Agent, Ticket, TicketRef};

/// Key of the shared bucket for tickets without an owner.
pub const UNASSIGNED_KEY: &str = "unassigned";

// ============================================================================
// BUCKET KEYS
// ============================================================================

/// Tally bucket: a concrete agent id or the shared unassigned bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentKey {
    Agent(String),
    Unassigned,
}

impl AgentKey {
    /// Resolve a raw assignee id. A missing id and the literal strings
    /// "none"/"null" (any casing) all mean the ticket is unassigned; any
    /// other id is kept verbatim.
    pub fn resolve(raw: Option<&str>) -> AgentKey {
        match raw {
            None => AgentKey::Unassigned,
            Some(id) => {
                let lowered = id.to_lowercase();
                if lowered.is_empty() || lowered == "none" || lowered == "null" {
                    AgentKey::Unassigned
                } else {
                    AgentKey::Agent(id.to_string())
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AgentKey::Agent(id) => id,
            AgentKey::Unassigned => UNASSIGNED_KEY,
        }
    }
}

// ============================================================================
// COUNTERS
// ============================================================================

/// Fixed-shape per-bucket counters, one instance per agent plus one for the
/// unassigned bucket. `escalated` is orthogonal to the other counters: an
/// escalated ticket lands there instead of its status counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub open: u64,
    pub closed: u64,
    pub hold: u64,
    pub escalated: u64,
    pub unassigned: u64,
    pub in_progress: u64,
}

impl StatusCounts {
    /// Sum of all six counters.
    pub fn total(&self) -> u64 {
        self.open + self.closed + self.hold + self.escalated + self.unassigned + self.in_progress
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Raw aggregation result keyed by bucket, before roster shaping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOutcome {
    /// One counter record per known or discovered bucket.
    pub counts: HashMap<AgentKey, StatusCounts>,
    /// Highest-numbered unassigned ticket seen per bucket.
    pub latest_unassigned: HashMap<AgentKey, TicketRef>,
    /// Every unassigned ticket reference in encounter order, duplicates kept.
    pub unassigned_ticket_numbers: Vec<TicketRef>,
}

/// Tally `tickets` into per-agent status counters.
///
/// Every user in `users` gets a zeroed record up front; assignee ids seen
/// only on tickets get one on the fly, so the output always covers both.
/// Routing per ticket, first match wins:
///
/// 1. unassigned bucket + normalized `closed` - dropped from all counters
/// 2. unassigned bucket - the bucket's `unassigned` counter
/// 3. normalized `unassigned` status, or the escalation flag - `escalated`
/// 4. otherwise the counter matching the normalized status
pub fn aggregate(tickets: &[Ticket], users: &[Agent]) -> AggregateOutcome {
    let mut counts: HashMap<AgentKey, StatusCounts> = HashMap::new();
    let mut latest_unassigned: HashMap<AgentKey, TicketRef> = HashMap::new();
    let mut unassigned_ticket_numbers: Vec<TicketRef> = Vec::new();

    for user in users {
        if let Some(id) = user.id.as_deref() {
            counts.entry(AgentKey::Agent(id.to_string())).or_default();
        }
    }
    counts.entry(AgentKey::Unassigned).or_default();

    for ticket in tickets {
        let key = AgentKey::resolve(ticket.assignee_id.as_deref());
        counts.entry(key.clone()).or_default();

        let status = normalize_status(ticket.status.as_deref());

        // Number tracking runs before the drop rule below, so a closed
        // unassigned ticket still surfaces in the number list.
        if key == AgentKey::Unassigned || status == CanonicalStatus::Unassigned {
            if let Some(reference) = ticket.reference() {
                unassigned_ticket_numbers.push(reference.clone());
                let supersedes = latest_unassigned
                    .get(&key)
                    .map_or(true, |current| reference.newer_than(current));
                if supersedes {
                    latest_unassigned.insert(key.clone(), reference.clone());
                }
            }
        }

        // Closed tickets in the unassigned bucket are not counted at all.
        if key == AgentKey::Unassigned && status == CanonicalStatus::Closed {
            continue;
        }

        let escalated = ticket.escalation_flagged();
        if let Some(entry) = counts.get_mut(&key) {
            match status {
                _ if key == AgentKey::Unassigned => entry.unassigned += 1,
                CanonicalStatus::Unassigned => entry.escalated += 1,
                _ if escalated => entry.escalated += 1,
                CanonicalStatus::Open => entry.open += 1,
                CanonicalStatus::Hold => entry.hold += 1,
                CanonicalStatus::Closed => entry.closed += 1,
                CanonicalStatus::InProgress => entry.in_progress += 1,
            }
        }
    }

    AggregateOutcome {
        counts,
        latest_unassigned,
        unassigned_ticket_numbers,
    }
}

// ============================================================================
// BOARD SHAPING
// ============================================================================

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub id: String,
    pub name: String,
    pub tickets: StatusCounts,
    /// Serialized as an explicit null when no unassigned ticket points here.
    pub latest_unassigned_ticket_id: Option<TicketRef>,
}

/// Full dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub members: Vec<BoardMember>,
    pub unassigned_ticket_numbers: Vec<TicketRef>,
}

/// Shape an aggregation outcome into the dashboard payload: one row per
/// roster user in roster order, then the synthetic Unassigned row last.
///
/// Buckets discovered on the fly (assignee ids absent from `users`) stay in
/// the outcome's counts map but get no row; the roster backfill in the desk
/// client is what normally puts them on the board.
pub fn build_board(outcome: AggregateOutcome, users: &[Agent]) -> BoardSnapshot {
    let AggregateOutcome {
        counts,
        latest_unassigned,
        unassigned_ticket_numbers,
    } = outcome;

    let mut members = Vec::with_capacity(users.len() + 1);
    for user in users {
        let Some(id) = user.id.as_deref() else {
            continue;
        };
        let key = AgentKey::Agent(id.to_string());
        let Some(tickets) = counts.get(&key) else {
            continue;
        };
        members.push(BoardMember {
            id: id.to_string(),
            name: user.resolved_name(),
            tickets: *tickets,
            latest_unassigned_ticket_id: latest_unassigned.get(&key).cloned(),
        });
    }

    members.push(BoardMember {
        id: UNASSIGNED_KEY.to_string(),
        name: Agent::unassigned().resolved_name(),
        tickets: counts
            .get(&AgentKey::Unassigned)
            .copied()
            .unwrap_or_default(),
        latest_unassigned_ticket_id: latest_unassigned.get(&AgentKey::Unassigned).cloned(),
    });

    BoardSnapshot {
        members,
        unassigned_ticket_numbers,
    }
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_assignee() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            2 => Just(None),
            1 => Just(Some("none".to_string())),
            1 => Just(Some("NULL".to_string())),
            1 => Just(Some(String::new())),
            4 => "u[0-3]".prop_map(Some),
        ]
    }

    fn arb_status() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            1 => Just(None),
            6 => prop::sample::select(vec![
                "open", "Open", "on hold", "hold", "closed", "Closed",
                "in progress", "unassigned", "", "bogus", "waiting",
            ])
            .prop_map(|s| Some(s.to_string())),
        ]
    }

    fn arb_escalated() -> impl Strategy<Value = Option<serde_json::Value>> {
        prop_oneof![
            3 => Just(None),
            1 => Just(Some(serde_json::Value::Bool(true))),
            1 => Just(Some(serde_json::Value::Bool(false))),
            1 => Just(Some(serde_json::json!("true"))),
            1 => Just(Some(serde_json::json!("false"))),
        ]
    }

    fn arb_ticket() -> impl Strategy<Value = Ticket> {
        (1i64..10_000, arb_assignee(), arb_status(), arb_escalated()).prop_map(
            |(id, assignee_id, status, escalated)| Ticket {
                id: Some(TicketRef::Num(id)),
                assignee_id,
                status,
                escalated,
                ..Ticket::default()
            },
        )
    }

    /// Independent count of tickets the drop rule removes.
    fn dropped(tickets: &[Ticket]) -> u64 {
        tickets
            .iter()
            .filter(|t| {
                AgentKey::resolve(t.assignee_id.as_deref()) == AgentKey::Unassigned
                    && normalize_status(t.status.as_deref()) == CanonicalStatus::Closed
            })
            .count() as u64
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Counter conservation: the grand total over all buckets equals the
        /// ticket count minus the closed-unassigned tickets that were dropped.
        #[test]
        fn prop_counter_sum_conservation(
            tickets in prop::collection::vec(arb_ticket(), 0..64),
        ) {
            let outcome = aggregate(&tickets, &[]);
            let total: u64 = outcome.counts.values().map(StatusCounts::total).sum();
            prop_assert_eq!(total, tickets.len() as u64 - dropped(&tickets));
        }

        /// Every assignee id referenced by any ticket keys the counts map.
        #[test]
        fn prop_every_assignee_has_an_entry(
            tickets in prop::collection::vec(arb_ticket(), 0..64),
        ) {
            let outcome = aggregate(&tickets, &[]);
            for ticket in &tickets {
                let key = AgentKey::resolve(ticket.assignee_id.as_deref());
                prop_assert!(outcome.counts.contains_key(&key));
            }
        }

        /// The sentinel bucket's `unassigned` counter covers exactly the
        /// ownerless tickets that survive the drop rule, and nothing else in
        /// that bucket ever increments.
        #[test]
        fn prop_sentinel_bucket_counts_ownerless_tickets(
            tickets in prop::collection::vec(arb_ticket(), 0..64),
        ) {
            let outcome = aggregate(&tickets, &[]);
            let sentinel = outcome.counts[&AgentKey::Unassigned];
            let expected = tickets
                .iter()
                .filter(|t| {
                    AgentKey::resolve(t.assignee_id.as_deref()) == AgentKey::Unassigned
                        && normalize_status(t.status.as_deref()) != CanonicalStatus::Closed
                })
                .count() as u64;
            prop_assert_eq!(sentinel.unassigned, expected);
            prop_assert_eq!(sentinel.total(), sentinel.unassigned);
        }

        /// Aggregation is a pure function of its inputs.
        #[test]
        fn prop_aggregation_idempotent(
            tickets in prop::collection::vec(arb_ticket(), 0..32),
        ) {
            prop_assert_eq!(aggregate(&tickets, &[]), aggregate(&tickets, &[]));
        }
    }
}
