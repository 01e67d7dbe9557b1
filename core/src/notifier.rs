//! Outbound notification abstraction.
//!
//! The [`Notifier`] trait models the channel that tells a requester their
//! ticket was decided. Notification is strictly best-effort: the worker
//! logs failures and moves on, and a send failure never fails the message
//! being processed.

use crate::eligibility::Decision;
use crate::types::Ticket;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Notification delivery failure.
///
/// Always swallowed after logging by the caller; carried as a typed error so
/// implementations can still report what went wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifierError {
    /// The channel rejected or failed to deliver the notification.
    #[error("notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Composed notification content.
///
/// Derived entirely from the ticket and its decision; building it is
/// side-effect free so any channel implementation can reuse it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Recipient identity, derived from the ticket's email
    pub recipient: String,
    /// Subject line carrying the short ticket ID
    pub subject: String,
    /// Body summarizing the decision
    pub body: String,
}

impl Notification {
    /// Compose the notification for a processed ticket.
    #[must_use]
    pub fn compose(ticket: &Ticket, decision: &Decision) -> Self {
        let status: crate::types::TicketStatus = decision.status.into();
        let subject = format!("Ticket #{} status update", ticket.ticket_id.short());
        let body = format!(
            "Hello {name},\n\n\
             Your warranty exchange ticket has been processed.\n\n\
             Ticket ID: {id}\n\
             Status: {status}\n\
             Reason: {reason}\n\n\
             Device: {brand} {model}\n\
             Serial number: {serial}\n\n\
             Opened at: {opened_at}\n",
            name = ticket.full_name,
            id = ticket.ticket_id,
            status = status,
            reason = decision.reason,
            brand = ticket.device.brand,
            model = ticket.device.model,
            serial = ticket.device.serial_number,
            opened_at = ticket.opened_at.to_rfc3339(),
        );
        Self {
            recipient: ticket.email.clone(),
            subject,
            body,
        }
    }
}

/// Trait for notification channel implementations.
///
/// # Dyn Compatibility
///
/// Methods return explicit `Pin<Box<dyn Future>>` so the trait can be used
/// as `Arc<dyn Notifier>` injected into the processing worker.
pub trait Notifier: Send + Sync {
    /// Send a decision notification for a processed ticket.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::DeliveryFailed`] if the channel could not
    /// deliver; callers log and continue.
    fn notify(
        &self,
        ticket: &Ticket,
        decision: &Decision,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifierError>> + Send + '_>>;
}

/// Notifier used when no channel is configured.
///
/// Every send is a documented no-op; the skip is logged at debug level so
/// operators can tell notifications are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(
        &self,
        ticket: &Ticket,
        _decision: &Decision,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifierError>> + Send + '_>> {
        let ticket_id = ticket.ticket_id;
        Box::pin(async move {
            tracing::debug!(ticket_id = %ticket_id, "No notification channel configured, skipping");
            Ok(())
        })
    }
}

/// Notifier that writes the composed notification to the structured log.
///
/// Useful in development and as a reference for real channel adapters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(
        &self,
        ticket: &Ticket,
        decision: &Decision,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifierError>> + Send + '_>> {
        let notification = Notification::compose(ticket, decision);
        Box::pin(async move {
            tracing::info!(
                recipient = %notification.recipient,
                subject = %notification.subject,
                body = %notification.body,
                "Notification sent"
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use crate::eligibility::decide;
    use crate::types::{Address, Device, TicketId, TicketRequest};
    use chrono::Utc;

    fn processed_ticket() -> (Ticket, Decision) {
        let request = TicketRequest {
            full_name: "Maria Silva".to_string(),
            national_id: "12345678909".to_string(),
            email: "maria@example.com".to_string(),
            phone: "+55 11 91234-5678".to_string(),
            address: Address {
                street: "Rua das Flores".to_string(),
                number: "42".to_string(),
                city: "Sao Paulo".to_string(),
                state: "SP".to_string(),
                postal_code: "01310-100".to_string(),
            },
            device: Device {
                brand: "Acme".to_string(),
                model: "Photon X".to_string(),
                serial_number: "SN12345".to_string(),
                purchase_date: String::new(),
                invoice_reference: "NF-0001".to_string(),
            },
            notes: String::new(),
        };
        let mut ticket = Ticket::open(request, TicketId::new(), Utc::now());
        let decision = decide(&ticket, Utc::now());
        ticket.apply_decision(&decision, Utc::now());
        (ticket, decision)
    }

    #[test]
    fn notification_summarizes_the_decision() {
        let (ticket, decision) = processed_ticket();
        let notification = Notification::compose(&ticket, &decision);
        assert_eq!(notification.recipient, "maria@example.com");
        assert!(notification.subject.contains(&ticket.ticket_id.short()));
        assert!(notification.body.contains(&ticket.ticket_id.to_string()));
        assert!(notification.body.contains("ACCEPTED"));
        assert!(notification.body.contains("Acme Photon X"));
        assert!(notification.body.contains(&ticket.opened_at.to_rfc3339()));
    }

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let (ticket, decision) = processed_ticket();
        assert!(NoopNotifier.notify(&ticket, &decision).await.is_ok());
    }
}
