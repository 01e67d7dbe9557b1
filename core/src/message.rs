//! Queue message envelope.
//!
//! A [`QueueMessage`] carries a serialized ticket body plus message-level
//! metadata (`ticket_id`, `status` at enqueue time) so downstream consumers
//! can route and filter without deserializing the full payload. The body is
//! JSON, matching the wire format the store and front door already speak.

use crate::types::{Ticket, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope decode/encode failure.
///
/// Decode failures are per-message: the consumer logs and skips the message
/// without aborting the rest of the batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// The ticket could not be serialized into a message body.
    #[error("failed to encode ticket: {0}")]
    Encode(String),

    /// The message body could not be deserialized into a ticket.
    #[error("failed to decode ticket from message body: {0}")]
    Decode(String),
}

/// Message envelope published by intake and consumed by the worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Correlation key, addressable without touching the body
    pub ticket_id: TicketId,
    /// Ticket status at enqueue time, addressable without touching the body
    pub status: TicketStatus,
    /// JSON-serialized [`Ticket`]
    pub body: Vec<u8>,
}

impl QueueMessage {
    /// Wrap a ticket into a queue message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Encode`] if the ticket cannot be serialized.
    pub fn from_ticket(ticket: &Ticket) -> Result<Self, MessageError> {
        let body = serde_json::to_vec(ticket).map_err(|e| MessageError::Encode(e.to_string()))?;
        Ok(Self {
            ticket_id: ticket.ticket_id,
            status: ticket.status,
            body,
        })
    }

    /// Deserialize the full ticket out of the message body.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Decode`] if the body is not a valid ticket.
    pub fn ticket(&self) -> Result<Ticket, MessageError> {
        serde_json::from_slice(&self.body).map_err(|e| MessageError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use crate::types::{Address, Device, TicketRequest};
    use chrono::Utc;

    fn sample_ticket() -> Ticket {
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
                purchase_date: "2025-01-15".to_string(),
                invoice_reference: "NF-0001".to_string(),
            },
            notes: String::new(),
        };
        Ticket::open(request, TicketId::new(), Utc::now())
    }

    #[test]
    fn envelope_metadata_matches_the_wrapped_ticket() {
        let ticket = sample_ticket();
        let message = QueueMessage::from_ticket(&ticket).unwrap();
        assert_eq!(message.ticket_id, ticket.ticket_id);
        assert_eq!(message.status, TicketStatus::Pending);
        assert_eq!(message.ticket().unwrap(), ticket);
    }

    #[test]
    fn garbage_bodies_fail_to_decode() {
        let ticket = sample_ticket();
        let mut message = QueueMessage::from_ticket(&ticket).unwrap();
        message.body = b"not json".to_vec();
        assert!(matches!(message.ticket(), Err(MessageError::Decode(_))));
    }
}
