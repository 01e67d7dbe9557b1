//! In-memory ticket store.

use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use warranty_exchange_core::store::{StoreError, TicketRecord, TicketStore};
use warranty_exchange_core::types::{Ticket, TicketId};

/// In-memory [`TicketStore`] keyed by [`TicketId`].
///
/// Reference implementation of the store contract: create rejects duplicate
/// IDs, update overwrites an existing record and refreshes `last_updated`.
/// Updates can be forced to fail for partial-failure tests.
#[derive(Default)]
pub struct InMemoryTicketStore {
    records: Arc<RwLock<HashMap<TicketId, TicketRecord>>>,
    fail_updates: AtomicBool,
}

impl InMemoryTicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `update` fail with a backend error.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Number of records currently held.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl TicketStore for InMemoryTicketStore {
    fn create(
        &self,
        ticket: &Ticket,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        let ticket = ticket.clone();
        Box::pin(async move {
            let mut records = self.records.write().await;
            if records.contains_key(&ticket.ticket_id) {
                return Err(StoreError::DuplicateId(ticket.ticket_id));
            }
            records.insert(
                ticket.ticket_id,
                TicketRecord {
                    ticket,
                    last_updated: Utc::now(),
                },
            );
            Ok(())
        })
    }

    fn update(
        &self,
        ticket: &Ticket,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        let ticket = ticket.clone();
        Box::pin(async move {
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("injected update failure".to_string()));
            }
            let mut records = self.records.write().await;
            match records.get_mut(&ticket.ticket_id) {
                Some(record) => {
                    record.ticket = ticket;
                    record.last_updated = Utc::now();
                    Ok(())
                }
                None => Err(StoreError::NotFound(ticket.ticket_id)),
            }
        })
    }

    fn get(
        &self,
        ticket_id: TicketId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TicketRecord>, StoreError>> + Send + '_>> {
        Box::pin(async move { Ok(self.records.read().await.get(&ticket_id).cloned()) })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use chrono::Utc;
    use warranty_exchange_core::types::{Address, Device, TicketRequest};

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
                purchase_date: "2025-11-20".to_string(),
                invoice_reference: "NF-0001".to_string(),
            },
            notes: String::new(),
        };
        Ticket::open(request, TicketId::new(), Utc::now())
    }

    #[tokio::test]
    async fn create_rejects_duplicate_ids() {
        let store = InMemoryTicketStore::new();
        let ticket = sample_ticket();
        store.create(&ticket).await.unwrap();
        assert_eq!(
            store.create(&ticket).await.unwrap_err(),
            StoreError::DuplicateId(ticket.ticket_id)
        );
    }

    #[tokio::test]
    async fn update_requires_an_existing_record() {
        let store = InMemoryTicketStore::new();
        let ticket = sample_ticket();
        assert_eq!(
            store.update(&ticket).await.unwrap_err(),
            StoreError::NotFound(ticket.ticket_id)
        );
    }
}
