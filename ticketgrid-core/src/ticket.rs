//! Upstream desk API records
//!
//! The desk API's ticket and user payloads are only loosely typed: id fields
//! arrive as JSON strings or numbers depending on tenant configuration, and
//! the escalation flag is a boolean on some endpoints and the string "true"
//! on others. These records absorb that looseness so that aggregation never
//! fails on a malformed field - anything unreadable degrades to its default.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// TICKET REFERENCE
// ============================================================================

/// Ticket identifier as it appears on the wire: number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum TicketRef {
    Num(i64),
    Text(String),
}

impl TicketRef {
    /// True when `self` supersedes `other` in latest-ticket tracking.
    ///
    /// Numeric comparison when both sides are numeric, lexicographic on the
    /// rendered form otherwise.
    pub fn newer_than(&self, other: &TicketRef) -> bool {
        match (self, other) {
            (TicketRef::Num(a), TicketRef::Num(b)) => a > b,
            _ => self.to_string() > other.to_string(),
        }
    }

    /// Zero and empty references read as absent, matching how the dashboard
    /// treats them.
    fn is_usable(&self) -> bool {
        match self {
            TicketRef::Num(n) => *n != 0,
            TicketRef::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for TicketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketRef::Num(n) => write!(f, "{}", n),
            TicketRef::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// WIRE RECORDS
// ============================================================================

/// One ticket as returned by the desk API's list endpoint.
///
/// `status` is uncontrolled free text; see [`crate::status::normalize_status`].
/// `is_escalated` and `escalated` are both consulted by
/// [`Ticket::escalation_flagged`] because the upstream populates one or the
/// other depending on API version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    pub id: Option<TicketRef>,
    pub ticket_number: Option<TicketRef>,
    #[serde(deserialize_with = "lenient_string")]
    pub assignee_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub contact_id: Option<String>,
    pub status: Option<String>,
    pub is_escalated: Option<bool>,
    pub escalated: Option<Value>,
}

impl Ticket {
    /// Whether the upstream flagged this ticket as escalated.
    ///
    /// Accepts `isEscalated: true` as well as `escalated` carrying the
    /// boolean `true` or any casing of the string `"true"`.
    pub fn escalation_flagged(&self) -> bool {
        if self.is_escalated == Some(true) {
            return true;
        }
        match &self.escalated {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// The identifier shown on the dashboard: the ticket number when usable,
    /// otherwise the raw id.
    pub fn reference(&self) -> Option<&TicketRef> {
        self.ticket_number
            .as_ref()
            .filter(|r| r.is_usable())
            .or_else(|| self.id.as_ref().filter(|r| r.is_usable()))
    }
}

/// One user (support agent) as returned by the desk API.
///
/// Every name field is optional; [`Agent::resolved_name`] picks the first
/// usable one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Agent {
    /// Resolve the display name, trying each field in a fixed priority
    /// order: first+last name, full name, display name, plain name, email.
    /// Falls back to "Unknown" when nothing usable is present.
    pub fn resolved_name(&self) -> String {
        fn usable(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|v| !v.is_empty())
        }

        if let (Some(first), Some(last)) = (usable(&self.first_name), usable(&self.last_name)) {
            return format!("{} {}", first, last);
        }

        usable(&self.full_name)
            .or_else(|| usable(&self.display_name))
            .or_else(|| usable(&self.name))
            .or_else(|| usable(&self.email))
            .unwrap_or("Unknown")
            .to_string()
    }

    /// The synthetic roster entry standing in for tickets nobody owns.
    pub fn unassigned() -> Self {
        Agent {
            id: Some(crate::board::UNASSIGNED_KEY.to_string()),
            full_name: Some("Unassigned".to_string()),
            display_name: Some("Unassigned".to_string()),
            ..Agent::default()
        }
    }
}

// ============================================================================
// LENIENT DESERIALIZATION
// ============================================================================

/// Deserialize a field that should be a string but may arrive as a number
/// or boolean. Null and structured values read as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(value: serde_json::Value) -> Ticket {
        serde_json::from_value(value).unwrap()
    }

    fn agent(value: serde_json::Value) -> Agent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_ticket_ref_numeric_comparison() {
        assert!(TicketRef::Num(100).newer_than(&TicketRef::Num(42)));
        assert!(!TicketRef::Num(42).newer_than(&TicketRef::Num(100)));
        assert!(!TicketRef::Num(42).newer_than(&TicketRef::Num(42)));
    }

    #[test]
    fn test_ticket_ref_lexicographic_fallback() {
        // Mixed types compare on the rendered form: "99" > "100".
        assert!(TicketRef::Text("99".to_string()).newer_than(&TicketRef::Num(100)));
        assert!(TicketRef::Text("TCK-9".to_string())
            .newer_than(&TicketRef::Text("TCK-10".to_string())));
    }

    #[test]
    fn test_ticket_accepts_numeric_and_string_ids() {
        let t = ticket(json!({"id": 17, "ticketNumber": "TCK-17", "assigneeId": 42}));
        assert_eq!(t.id, Some(TicketRef::Num(17)));
        assert_eq!(t.ticket_number, Some(TicketRef::Text("TCK-17".to_string())));
        assert_eq!(t.assignee_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_ticket_missing_fields_default() {
        let t = ticket(json!({}));
        assert_eq!(t.id, None);
        assert_eq!(t.assignee_id, None);
        assert_eq!(t.status, None);
        assert!(!t.escalation_flagged());
    }

    #[test]
    fn test_escalation_flag_variants() {
        assert!(ticket(json!({"isEscalated": true})).escalation_flagged());
        assert!(ticket(json!({"escalated": true})).escalation_flagged());
        assert!(ticket(json!({"escalated": "true"})).escalation_flagged());
        assert!(ticket(json!({"escalated": "TRUE"})).escalation_flagged());
        assert!(!ticket(json!({"escalated": "false"})).escalation_flagged());
        assert!(!ticket(json!({"escalated": "yes"})).escalation_flagged());
        assert!(!ticket(json!({"isEscalated": false})).escalation_flagged());
        assert!(!ticket(json!({"escalated": null})).escalation_flagged());
    }

    #[test]
    fn test_reference_prefers_ticket_number() {
        let t = ticket(json!({"id": 5, "ticketNumber": 500}));
        assert_eq!(t.reference(), Some(&TicketRef::Num(500)));
    }

    #[test]
    fn test_reference_falls_back_to_id() {
        let t = ticket(json!({"id": 5}));
        assert_eq!(t.reference(), Some(&TicketRef::Num(5)));

        // Empty ticket number is treated as absent.
        let t = ticket(json!({"id": 5, "ticketNumber": ""}));
        assert_eq!(t.reference(), Some(&TicketRef::Num(5)));
    }

    #[test]
    fn test_reference_absent_when_nothing_usable() {
        let t = ticket(json!({"ticketNumber": 0}));
        assert_eq!(t.reference(), None);
    }

    #[test]
    fn test_resolved_name_priority_order() {
        let a = agent(json!({
            "id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "fullName": "A. Lovelace",
            "email": "ada@example.com"
        }));
        assert_eq!(a.resolved_name(), "Ada Lovelace");

        let a = agent(json!({"id": "u2", "fullName": "Grace Hopper", "name": "ghopper"}));
        assert_eq!(a.resolved_name(), "Grace Hopper");

        let a = agent(json!({"id": "u3", "displayName": "Ops Bot"}));
        assert_eq!(a.resolved_name(), "Ops Bot");

        let a = agent(json!({"id": "u4", "email": "oncall@example.com"}));
        assert_eq!(a.resolved_name(), "oncall@example.com");
    }

    #[test]
    fn test_resolved_name_requires_both_first_and_last() {
        let a = agent(json!({"id": "u5", "firstName": "Ada", "email": "ada@example.com"}));
        assert_eq!(a.resolved_name(), "ada@example.com");
    }

    #[test]
    fn test_resolved_name_unknown_fallback() {
        let a = agent(json!({"id": "u6"}));
        assert_eq!(a.resolved_name(), "Unknown");

        // Empty strings are not usable names.
        let a = agent(json!({"id": "u7", "fullName": "", "displayName": ""}));
        assert_eq!(a.resolved_name(), "Unknown");
    }

    #[test]
    fn test_unassigned_roster_entry() {
        let a = Agent::unassigned();
        assert_eq!(a.id.as_deref(), Some("unassigned"));
        assert_eq!(a.resolved_name(), "Unassigned");
    }

    #[test]
    fn test_ticket_round_trips_camel_case() {
        let t = ticket(json!({"id": 1, "ticketNumber": 10, "status": "Open"}));
        let out = serde_json::to_value(&t).unwrap();
        assert_eq!(out["ticketNumber"], json!(10));
        assert_eq!(out["status"], json!("Open"));
    }
}
