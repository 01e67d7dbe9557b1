//! Domain types for the warranty exchange pipeline.
//!
//! This module contains the identifiers, value objects and the `Ticket`
//! entity tracked through the two-stage pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket.
///
/// Assigned exactly once by the intake service and used as the sole key to
/// correlate a logical ticket across store, queue and notifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`.
    ///
    /// Backed by a v4 UUID (122 random bits), so collision probability is
    /// cryptographically negligible.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short form of the identifier (first 8 hex characters), used in
    /// notification subject lines.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.to_string().chars().take(8).collect()
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ticket status
// ============================================================================

/// Lifecycle status of a ticket.
///
/// Created `Pending` by intake; the processing worker moves it to exactly
/// one of `Accepted` or `Rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Created by intake, not yet processed
    Pending,
    /// Eligible for warranty exchange
    Accepted,
    /// Not eligible for warranty exchange
    Rejected,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{label}")
    }
}

// ============================================================================
// Value objects
// ============================================================================

/// Customer postal address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street name
    pub street: String,
    /// Street number
    pub number: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub postal_code: String,
}

/// Device under warranty plus proof of purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Manufacturer brand
    pub brand: String,
    /// Device model
    pub model: String,
    /// Manufacturer serial number
    pub serial_number: String,
    /// Purchase date as supplied by the caller (RFC 3339 or bare date)
    pub purchase_date: String,
    /// Invoice reference proving the purchase
    pub invoice_reference: String,
}

// ============================================================================
// Ticket request and ticket entity
// ============================================================================

/// Structurally valid intake payload.
///
/// Only the [`validator`](crate::validator) constructs this type, so holding
/// a `TicketRequest` is proof the payload passed intake validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Customer full name
    pub full_name: String,
    /// Customer national ID (11 digits after stripping separators)
    pub national_id: String,
    /// Customer email address
    pub email: String,
    /// Customer phone number
    pub phone: String,
    /// Customer postal address
    pub address: Address,
    /// Device and proof of purchase
    pub device: Device,
    /// Optional free-text notes (empty when omitted)
    #[serde(default)]
    pub notes: String,
}

/// A warranty-exchange request tracked through its lifecycle.
///
/// Owned by the store for its entire life; intake and the processing worker
/// each hold only a transient copy during their respective operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier, immutable after assignment
    pub ticket_id: TicketId,
    /// Current lifecycle status
    pub status: TicketStatus,
    /// When intake created the ticket, immutable
    pub opened_at: DateTime<Utc>,
    /// When the first processing attempt completed (`None` until processed)
    pub processed_at: Option<DateTime<Utc>>,
    /// Human-readable decision reason (`None` until processed)
    pub decision_reason: Option<String>,
    /// Customer full name
    pub full_name: String,
    /// Customer national ID
    pub national_id: String,
    /// Customer email address
    pub email: String,
    /// Customer phone number
    pub phone: String,
    /// Customer postal address
    pub address: Address,
    /// Device and proof of purchase
    pub device: Device,
    /// Free-text notes
    pub notes: String,
}

impl Ticket {
    /// Open a new pending ticket from a validated request.
    #[must_use]
    pub fn open(request: TicketRequest, ticket_id: TicketId, opened_at: DateTime<Utc>) -> Self {
        Self {
            ticket_id,
            status: TicketStatus::Pending,
            opened_at,
            processed_at: None,
            decision_reason: None,
            full_name: request.full_name,
            national_id: request.national_id,
            email: request.email,
            phone: request.phone,
            address: request.address,
            device: request.device,
            notes: request.notes,
        }
    }

    /// Fold an eligibility decision into the ticket's mutable fields.
    ///
    /// Overwrites status, `processed_at` and `decision_reason`; applying the
    /// same decision twice yields the same semantic state, which is what
    /// makes duplicate queue delivery safe.
    pub fn apply_decision(
        &mut self,
        decision: &crate::eligibility::Decision,
        processed_at: DateTime<Utc>,
    ) {
        self.status = decision.status.into();
        self.processed_at = Some(processed_at);
        self.decision_reason = Some(decision.reason.clone());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ticket_id_is_unique_across_many_generations() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(TicketId::new()), "ticket id collision");
        }
    }

    #[test]
    fn ticket_id_short_form_is_prefix_of_display() {
        let id = TicketId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().starts_with(&id.short()));
    }

    #[test]
    fn status_serializes_in_screaming_snake_case() {
        let json = serde_json::to_string(&TicketStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        assert_eq!(TicketStatus::Accepted.to_string(), "ACCEPTED");
    }
}
