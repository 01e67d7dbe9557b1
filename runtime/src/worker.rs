//! Asynchronous ticket processing.
//!
//! [`ProcessingWorker`] consumes queue messages, runs the eligibility
//! engine, persists the decision and fires a best-effort notification. Each
//! message is an independent unit of work: one malformed message or one
//! store failure never aborts the rest of a batch, and re-delivering the
//! same message produces the same stored state (at worst a duplicate
//! notification, which the at-least-once queue contract accepts).

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use warranty_exchange_core::eligibility;
use warranty_exchange_core::environment::Clock;
use warranty_exchange_core::message::{MessageError, QueueMessage};
use warranty_exchange_core::notifier::Notifier;
use warranty_exchange_core::store::{StoreError, TicketStore};
use warranty_exchange_core::types::TicketId;

/// Per-message processing failure.
///
/// A failed message is not acknowledged as processed; redelivery is the
/// queue's responsibility, not the worker's.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    /// The message body could not be decoded into a ticket.
    #[error("malformed message for ticket {ticket_id}: {source}")]
    Parse {
        /// Correlation key from the message metadata
        ticket_id: TicketId,
        /// The underlying decode failure
        source: MessageError,
    },

    /// The decision could not be persisted.
    #[error("failed to persist decision for ticket {ticket_id}: {source}")]
    Store {
        /// The ticket being processed
        ticket_id: TicketId,
        /// The underlying store failure
        source: StoreError,
    },
}

/// Summary of a batch invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Messages fully processed (decision persisted)
    pub processed: usize,
    /// Messages that failed and were left for redelivery
    pub failed: usize,
}

/// Orchestrates decide → persist → notify for each queue message.
pub struct ProcessingWorker {
    store: Arc<dyn TicketStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl ProcessingWorker {
    /// Create a processing worker over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    /// Process a batch of messages, each independently.
    ///
    /// Failures are logged and counted; processing always continues with
    /// the next message.
    pub async fn process_batch(&self, messages: &[QueueMessage]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for message in messages {
            match self.process_message(message).await {
                Ok(()) => outcome.processed += 1,
                Err(e) => {
                    error!(ticket_id = %message.ticket_id, error = %e, "Failed to process message");
                    outcome.failed += 1;
                }
            }
        }
        info!(
            processed = outcome.processed,
            failed = outcome.failed,
            "Batch complete"
        );
        outcome
    }

    /// Process a single message: decode, decide, persist, notify.
    ///
    /// Safe to re-invoke with the same message: the store update overwrites
    /// the same mutable fields with the same decision.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::Parse`] for undecodable bodies and
    /// [`ProcessingError::Store`] when the decision could not be persisted.
    /// Notifier failures are logged and swallowed, never returned.
    pub async fn process_message(&self, message: &QueueMessage) -> Result<(), ProcessingError> {
        let ticket_id = message.ticket_id;
        let mut ticket = message.ticket().map_err(|source| ProcessingError::Parse {
            ticket_id,
            source,
        })?;

        let decision = eligibility::decide(&ticket, self.clock.now());
        ticket.apply_decision(&decision, self.clock.now());

        self.store
            .update(&ticket)
            .await
            .map_err(|source| ProcessingError::Store { ticket_id, source })?;

        // Fire-and-forget: the decision is already durable, and the queue
        // must not redeliver just because a notification bounced.
        if let Err(e) = self.notifier.notify(&ticket, &decision).await {
            warn!(ticket_id = %ticket_id, error = %e, "Notification failed, continuing");
        }

        info!(
            ticket_id = %ticket_id,
            status = %ticket.status,
            "Ticket processed"
        );
        Ok(())
    }
}
