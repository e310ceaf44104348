//! Ticket status normalization
//!
//! Upstream status values are free text typed by humans. This module maps
//! the known variants onto a fixed set of canonical buckets; everything the
//! table does not recognize lands in [`CanonicalStatus::Unassigned`], which
//! keeps the dashboard total stable when the upstream grows a new status
//! string.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical status buckets tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum CanonicalStatus {
    Open,
    Hold,
    Closed,
    InProgress,
    /// Default bucket for empty, missing, and unrecognized statuses.
    Unassigned,
}

/// Known upstream spellings, matched after lowercasing.
static STATUS_TABLE: Lazy<HashMap<&'static str, CanonicalStatus>> = Lazy::new(|| {
    HashMap::from([
        ("open", CanonicalStatus::Open),
        ("on hold", CanonicalStatus::Hold),
        ("hold", CanonicalStatus::Hold),
        ("closed", CanonicalStatus::Closed),
        ("in progress", CanonicalStatus::InProgress),
        ("unassigned", CanonicalStatus::Unassigned),
        ("", CanonicalStatus::Unassigned),
    ])
});

/// Map an upstream free-text status onto its canonical bucket.
///
/// Matching is case-insensitive. A missing status reads as the empty string.
pub fn normalize_status(raw: Option<&str>) -> CanonicalStatus {
    let lowered = raw.unwrap_or("").to_lowercase();
    STATUS_TABLE
        .get(lowered.as_str())
        .copied()
        .unwrap_or(CanonicalStatus::Unassigned)
}

// =============================================================================
// TESTS
// =============================================================================
