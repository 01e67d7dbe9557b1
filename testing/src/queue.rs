//! In-memory ticket queue.

use async_stream::stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};
use warranty_exchange_core::message::QueueMessage;
use warranty_exchange_core::queue::{MessageStream, QueueError, TicketQueue};

/// In-memory [`TicketQueue`] backed by an unbounded channel.
///
/// Supports two consumption styles: [`TicketQueue::subscribe`] for the
/// consumer loop, and [`InMemoryTicketQueue::drain`] for tests that want to
/// pull the buffered messages and feed them to a worker batch directly.
/// Enqueues can be forced to fail to exercise intake's delivery-gap path.
pub struct InMemoryTicketQueue {
    tx: mpsc::UnboundedSender<QueueMessage>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<QueueMessage>>>,
    enqueued: AtomicUsize,
    fail_enqueue: AtomicBool,
}

impl Default for InMemoryTicketQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTicketQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            enqueued: AtomicUsize::new(0),
            fail_enqueue: AtomicBool::new(false),
        }
    }

    /// Make every subsequent enqueue fail.
    pub fn fail_enqueue(&self, fail: bool) {
        self.fail_enqueue.store(fail, Ordering::SeqCst);
    }

    /// Total messages successfully enqueued.
    pub fn enqueued_count(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }

    /// Pull every currently buffered message.
    ///
    /// Leaves the receiver in place so `subscribe` still works afterwards
    /// for messages enqueued later.
    pub async fn drain(&self) -> Vec<QueueMessage> {
        let mut guard = self.rx.lock().await;
        let mut drained = Vec::new();
        if let Some(rx) = guard.as_mut() {
            while let Ok(message) = rx.try_recv() {
                drained.push(message);
            }
        }
        drained
    }
}

impl TicketQueue for InMemoryTicketQueue {
    fn enqueue(
        &self,
        message: &QueueMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), QueueError>> + Send + '_>> {
        let message = message.clone();
        Box::pin(async move {
            if self.fail_enqueue.load(Ordering::SeqCst) {
                return Err(QueueError::EnqueueFailed(
                    "injected enqueue failure".to_string(),
                ));
            }
            self.tx
                .send(message)
                .map_err(|e| QueueError::EnqueueFailed(e.to_string()))?;
            self.enqueued.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn subscribe(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<MessageStream, QueueError>> + Send + '_>> {
        Box::pin(async move {
            let mut rx = self.rx.lock().await.take().ok_or_else(|| {
                QueueError::SubscriptionFailed("queue already has a subscriber".to_string())
            })?;
            let stream: MessageStream = Box::pin(stream! {
                while let Some(message) = rx.recv().await {
                    yield Ok(message);
                }
            });
            Ok(stream)
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

    use super::*;
    use chrono::Utc;
    use warranty_exchange_core::types::{Address, Device, Ticket, TicketId, TicketRequest};

    fn sample_message() -> QueueMessage {
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
        let ticket = Ticket::open(request, TicketId::new(), Utc::now());
        QueueMessage::from_ticket(&ticket).unwrap()
    }

    #[tokio::test]
    async fn drain_returns_buffered_messages_in_order() {
        let queue = InMemoryTicketQueue::new();
        let first = sample_message();
        let second = sample_message();
        queue.enqueue(&first).await.unwrap();
        queue.enqueue(&second).await.unwrap();

        let drained = queue.drain().await;
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].ticket_id, first.ticket_id);
        assert_eq!(queue.enqueued_count(), 2);
    }

    #[tokio::test]
    async fn injected_failure_rejects_enqueues() {
        let queue = InMemoryTicketQueue::new();
        queue.fail_enqueue(true);
        let err = queue.enqueue(&sample_message()).await.unwrap_err();
        assert!(matches!(err, QueueError::EnqueueFailed(_)));
        assert_eq!(queue.enqueued_count(), 0);
    }

    #[tokio::test]
    async fn only_one_subscriber_is_allowed() {
        let queue = InMemoryTicketQueue::new();
        let _stream = queue.subscribe().await.unwrap();
        assert!(queue.subscribe().await.is_err());
    }
}
