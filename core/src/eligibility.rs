//! Eligibility state machine for warranty exchange decisions.
//!
//! [`decide`] is a pure, total function from a ticket and an evaluation time
//! to a [`Decision`]. Rejection is a normal outcome carried in the return
//! value, never an error, and anything anomalous inside the rules fails
//! closed to `Rejected`.
//!
//! Rules are evaluated in order and short-circuit on the first failure:
//!
//! 1. Warranty window — more than 12 months elapsed since purchase, using a
//!    30-day-per-month approximation over whole elapsed days
//! 2. Invoice reference — must be non-empty after trimming
//! 3. Serial number — trimmed length must be at least 5 characters
//!
//! A missing or unparsable purchase date skips rule 1 rather than rejecting.
//! That laxity is inherited behavior, preserved deliberately: tickets whose
//! purchase date cannot be read are decided on invoice and serial alone.

use crate::types::{Ticket, TicketStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Number of months in the warranty window.
pub const WARRANTY_MONTHS: f64 = 12.0;

/// Days per month used by the warranty window approximation.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Minimum trimmed serial number length considered valid.
pub const MIN_SERIAL_LEN: usize = 5;

/// Outcome of an eligibility decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionStatus {
    /// The ticket is eligible for warranty exchange
    Accepted,
    /// The ticket is not eligible
    Rejected,
}

impl From<DecisionStatus> for TicketStatus {
    fn from(status: DecisionStatus) -> Self {
        match status {
            DecisionStatus::Accepted => Self::Accepted,
            DecisionStatus::Rejected => Self::Rejected,
        }
    }
}

/// The accept/reject outcome of the eligibility engine.
///
/// Not persisted independently; the worker folds it into the ticket via
/// [`Ticket::apply_decision`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Accepted or rejected
    pub status: DecisionStatus,
    /// Human-readable explanation, surfaced to the requester
    pub reason: String,
}

impl Decision {
    fn accepted(reason: impl Into<String>) -> Self {
        Self {
            status: DecisionStatus::Accepted,
            reason: reason.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            status: DecisionStatus::Rejected,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the decision accepted the ticket.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self.status, DecisionStatus::Accepted)
    }
}

/// Decide whether a ticket is eligible for warranty exchange.
///
/// Deterministic: the same ticket and the same evaluation time always
/// produce the same decision. Callers inject `now` (usually from a
/// [`Clock`](crate::environment::Clock)) so the warranty window can be
/// tested at exact boundaries.
#[must_use]
pub fn decide(ticket: &Ticket, now: DateTime<Utc>) -> Decision {
    let device = &ticket.device;

    if let Some(purchased_at) = parse_purchase_date(&device.purchase_date) {
        let elapsed_days = (now - purchased_at).num_days();
        #[allow(clippy::cast_precision_loss)] // elapsed days fit f64 exactly
        let elapsed_months = elapsed_days as f64 / DAYS_PER_MONTH;
        if elapsed_months > WARRANTY_MONTHS {
            return Decision::rejected(format!(
                "Device out of warranty: purchased {elapsed_months:.1} months ago (>12 month window)."
            ));
        }
    }

    if device.invoice_reference.trim().is_empty() {
        return Decision::rejected("Invoice reference missing or invalid.");
    }

    if device.serial_number.trim().len() < MIN_SERIAL_LEN {
        return Decision::rejected("Serial number missing or too short.");
    }

    Decision::accepted("Ticket approved: device is eligible for warranty exchange.")
}

/// Parse a caller-supplied purchase date.
///
/// Accepts RFC 3339 timestamps, naive datetimes and bare dates; anything
/// else yields `None` and the warranty rule is skipped.
fn parse_purchase_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
