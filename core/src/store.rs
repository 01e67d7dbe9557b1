//! Durable ticket storage abstraction.
//!
//! The [`TicketStore`] trait models the keyed durable store both pipeline
//! stages write to. Implementations are expected to be atomic per ticket;
//! no cross-ticket transactions are required anywhere in the core.
//!
//! # Idempotency
//!
//! `update` is a full overwrite of the mutable fields (status,
//! `processed_at`, `decision_reason`). Applying the same decision twice
//! yields the same stored state, which is what the at-least-once queue
//! contract requires of consumers.
//!
//! # Dyn Compatibility
//!
//! Methods return explicit `Pin<Box<dyn Future>>` instead of `async fn` so
//! the trait can be used as `Arc<dyn TicketStore>` and injected into the
//! intake service and the processing worker.

use crate::types::{Ticket, TicketId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A ticket with this ID already exists; creation must never overwrite.
    #[error("ticket {0} already exists")]
    DuplicateId(TicketId),

    /// No ticket with this ID exists to update.
    #[error("ticket {0} not found")]
    NotFound(TicketId),

    /// Backend failure (connection, timeout, etc.).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The persisted shape of a ticket: the entity plus a store-maintained
/// `last_updated` timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// The ticket entity
    pub ticket: Ticket,
    /// When the store last wrote this record
    pub last_updated: DateTime<Utc>,
}

/// Trait for durable keyed ticket storage.
///
/// Keyed by [`TicketId`]; each operation is atomic per ticket.
pub trait TicketStore: Send + Sync {
    /// Create a new ticket record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if a record with the same ID
    /// already exists. An ID collision is astronomically unlikely, but the
    /// contract requires rejecting it rather than silently overwriting.
    fn create(
        &self,
        ticket: &Ticket,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Overwrite the mutable fields of an existing ticket record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the ticket was never created.
    fn update(
        &self,
        ticket: &Ticket,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Fetch a ticket record by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] on backend failure; a missing record
    /// is `Ok(None)`, not an error.
    fn get(
        &self,
        ticket_id: TicketId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TicketRecord>, StoreError>> + Send + '_>>;
}
