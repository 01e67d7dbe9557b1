//! Synchronous intake: validate, create, enqueue.
//!
//! [`IntakeService`] is the front door of the pipeline. It owns ticket-ID
//! assignment and is the only component allowed to create tickets; the
//! processing side only ever updates them.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use warranty_exchange_core::environment::Clock;
use warranty_exchange_core::message::{MessageError, QueueMessage};
use warranty_exchange_core::queue::{QueueError, TicketQueue};
use warranty_exchange_core::store::{StoreError, TicketStore};
use warranty_exchange_core::types::{Ticket, TicketId, TicketStatus};
use warranty_exchange_core::validator::{self, ValidationError};

/// Errors returned by [`IntakeService::open_ticket`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// The payload failed validation; a caller error, never retried as-is.
    #[error("invalid ticket payload: {0}")]
    Validation(#[from] ValidationError),

    /// A freshly generated ID collided with an existing ticket. Hard
    /// failure of creation; the caller must retry with a new attempt.
    #[error("ticket id collision on {0}")]
    IdCollision(TicketId),

    /// The store rejected the create for backend reasons.
    #[error("failed to persist ticket: {0}")]
    Store(StoreError),

    /// The ticket could not be encoded for the queue after it was created.
    #[error("ticket {ticket_id} persisted but could not be encoded for processing: {source}")]
    Encode {
        /// The orphaned ticket
        ticket_id: TicketId,
        /// The underlying encode failure
        source: MessageError,
    },

    /// The ticket was created but the enqueue failed. The caller sees a
    /// failure; the orphaned PENDING ticket is logged for compensating
    /// cleanup (an at-least-once delivery gap a transactional outbox would
    /// close).
    #[error("ticket {ticket_id} persisted but could not be enqueued: {source}")]
    Enqueue {
        /// The orphaned ticket
        ticket_id: TicketId,
        /// The underlying queue failure
        source: QueueError,
    },
}

impl IntakeError {
    /// Returns `true` if the error is the caller's fault (maps to a 4xx at
    /// the front door); everything else is a server-side failure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Successful intake result: the assigned ID and the initial status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TicketOpened {
    /// The freshly assigned ticket ID
    pub ticket_id: TicketId,
    /// Always [`TicketStatus::Pending`] at intake time
    pub status: TicketStatus,
}

/// Front-door response envelope.
///
/// Mirrors the `{success, message, ticket_id?, status?}` shape the external
/// HTTP layer serializes; the transport status code mapping stays outside
/// this crate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct IntakeResponse {
    /// Whether the ticket was opened
    pub success: bool,
    /// Human-readable outcome message
    pub message: String,
    /// Assigned ticket ID on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<TicketId>,
    /// Initial status on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

impl From<Result<TicketOpened, IntakeError>> for IntakeResponse {
    fn from(result: Result<TicketOpened, IntakeError>) -> Self {
        match result {
            Ok(opened) => Self {
                success: true,
                message: "Ticket created successfully".to_string(),
                ticket_id: Some(opened.ticket_id),
                status: Some(opened.status),
            },
            Err(err) => Self {
                success: false,
                message: err.to_string(),
                ticket_id: None,
                status: None,
            },
        }
    }
}

/// Orchestrates validation, ID assignment, durable creation and enqueue.
///
/// Has no dependency on the eligibility engine or the notifier; those
/// belong exclusively to the processing side.
pub struct IntakeService {
    store: Arc<dyn TicketStore>,
    queue: Arc<dyn TicketQueue>,
    clock: Arc<dyn Clock>,
}

impl IntakeService {
    /// Create an intake service over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        queue: Arc<dyn TicketQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            queue,
            clock,
        }
    }

    /// Open a ticket from a raw intake payload.
    ///
    /// Validates the payload, assigns a fresh ID, persists the ticket
    /// PENDING and enqueues it for asynchronous processing. The ticket is
    /// enqueued only after it is durably created, which is the pipeline's
    /// one ordering guarantee.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::Validation`] for malformed payloads (client error)
    /// - [`IntakeError::IdCollision`] if the store already holds the ID
    /// - [`IntakeError::Store`] on store backend failure
    /// - [`IntakeError::Encode`] / [`IntakeError::Enqueue`] when the ticket
    ///   was created but never reached the queue; the caller must not treat
    ///   the ticket as opened
    pub async fn open_ticket(&self, payload: &Value) -> Result<TicketOpened, IntakeError> {
        let request = validator::validate(payload)?;

        let ticket_id = TicketId::new();
        let ticket = Ticket::open(request, ticket_id, self.clock.now());

        self.store.create(&ticket).await.map_err(|e| match e {
            StoreError::DuplicateId(id) => IntakeError::IdCollision(id),
            other => IntakeError::Store(other),
        })?;

        let message = match QueueMessage::from_ticket(&ticket) {
            Ok(message) => message,
            Err(source) => {
                error!(
                    ticket_id = %ticket_id,
                    error = %source,
                    "Ticket persisted but could not be encoded; compensating cleanup required"
                );
                return Err(IntakeError::Encode { ticket_id, source });
            }
        };

        if let Err(source) = self.queue.enqueue(&message).await {
            error!(
                ticket_id = %ticket_id,
                error = %source,
                "Ticket persisted but not enqueued; compensating cleanup required"
            );
            return Err(IntakeError::Enqueue { ticket_id, source });
        }

        info!(ticket_id = %ticket_id, "Ticket created and enqueued for processing");

        Ok(TicketOpened {
            ticket_id,
            status: ticket.status,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use warranty_exchange_core::validator::ValidationError;

    #[test]
    fn validation_errors_are_client_errors() {
        let err = IntakeError::Validation(ValidationError::InvalidEmail);
        assert!(err.is_client_error());
        let err = IntakeError::Store(StoreError::Backend("down".to_string()));
        assert!(!err.is_client_error());
    }

    #[test]
    fn response_envelope_reflects_the_outcome() {
        let opened = TicketOpened {
            ticket_id: TicketId::new(),
            status: TicketStatus::Pending,
        };
        let response = IntakeResponse::from(Ok(opened));
        assert!(response.success);
        assert_eq!(response.status, Some(TicketStatus::Pending));

        let response =
            IntakeResponse::from(Err(IntakeError::Validation(ValidationError::InvalidEmail)));
        assert!(!response.success);
        assert!(response.ticket_id.is_none());
        assert!(response.message.contains("email"));
    }
}
