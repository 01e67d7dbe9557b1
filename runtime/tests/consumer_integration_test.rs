//! Consumer loop tests: background processing and graceful shutdown.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use warranty_exchange_core::store::{TicketRecord, TicketStore};
use warranty_exchange_core::types::{TicketId, TicketStatus};
use warranty_exchange_runtime::{IntakeService, ProcessingWorker, QueueConsumer};
use warranty_exchange_testing::mocks::test_clock;
use warranty_exchange_testing::payload::valid_payload;
use warranty_exchange_testing::{InMemoryTicketQueue, InMemoryTicketStore, RecordingNotifier};

async fn wait_for_processed(
    store: &InMemoryTicketStore,
    ticket_id: TicketId,
) -> Option<TicketRecord> {
    for _ in 0..200 {
        if let Some(record) = store.get(ticket_id).await.unwrap() {
            if record.ticket.status != TicketStatus::Pending {
                return Some(record);
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test]
async fn consumer_processes_enqueued_tickets_in_the_background() {
    warranty_exchange_testing::init_test_tracing();
    let store = Arc::new(InMemoryTicketStore::new());
    let queue = Arc::new(InMemoryTicketQueue::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(test_clock());

    let intake = IntakeService::new(store.clone(), queue.clone(), clock.clone());
    let worker = Arc::new(ProcessingWorker::new(
        store.clone(),
        notifier.clone(),
        clock,
    ));

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = QueueConsumer::builder()
        .name("test-consumer")
        .queue(queue.clone())
        .worker(worker)
        .shutdown(shutdown_rx)
        .retry_delay(Duration::from_millis(50))
        .build()
        .spawn();

    let opened = intake.open_ticket(&valid_payload()).await.unwrap();

    let record = wait_for_processed(&store, opened.ticket_id)
        .await
        .expect("ticket should be processed by the consumer");
    assert_eq!(record.ticket.status, TicketStatus::Accepted);
    assert_eq!(notifier.sent_count().await, 1);

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("consumer should shut down promptly")
        .unwrap();
}

#[tokio::test]
async fn consumer_survives_messages_it_cannot_process() {
    let store = Arc::new(InMemoryTicketStore::new());
    let queue = Arc::new(InMemoryTicketQueue::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(test_clock());

    let intake = IntakeService::new(store.clone(), queue.clone(), clock.clone());
    let worker = Arc::new(ProcessingWorker::new(
        store.clone(),
        notifier.clone(),
        clock,
    ));

    // First ticket will fail its store update; the consumer must keep going
    // and process the second one.
    let first = intake.open_ticket(&valid_payload()).await.unwrap();
    store.fail_updates(true);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = QueueConsumer::new("test-consumer", queue.clone(), worker, shutdown_rx).spawn();

    // Give the consumer time to fail on the first message, then recover the
    // store and enqueue a second ticket.
    tokio::time::sleep(Duration::from_millis(100)).await;
    store.fail_updates(false);
    let second = intake.open_ticket(&valid_payload()).await.unwrap();

    let record = wait_for_processed(&store, second.ticket_id)
        .await
        .expect("second ticket should be processed");
    assert_eq!(record.ticket.status, TicketStatus::Accepted);

    // The first ticket stayed pending, awaiting the queue's redelivery.
    let first_record = store.get(first.ticket_id).await.unwrap().unwrap();
    assert_eq!(first_record.ticket.status, TicketStatus::Pending);

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("consumer should shut down promptly")
        .unwrap();
}
