//! Queue consumer with automatic reconnection.
//!
//! [`QueueConsumer`] wraps the subscribe-process-reconnect boilerplate
//! around a [`ProcessingWorker`]: subscribe to the queue, hand each message
//! to the worker, log per-message failures without crashing, reconnect
//! after a delay when the stream ends or the subscription fails, and exit
//! cleanly on a broadcast shutdown signal.
//!
//! ```text
//! loop {
//!     subscribe:
//!         loop {
//!             - hand message to worker
//!             - log errors (don't crash)
//!             - check shutdown signal
//!         }
//!     wait retry_delay, resubscribe
//! }
//! ```

use crate::worker::ProcessingWorker;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use warranty_exchange_core::queue::{MessageStream, TicketQueue};

/// Long-running queue consumer driving a [`ProcessingWorker`].
///
/// # Lifecycle
///
/// 1. Created via [`QueueConsumer::builder`] or [`QueueConsumer::new`]
/// 2. Spawned as a background task via [`QueueConsumer::spawn`]
/// 3. Runs until a shutdown signal arrives
pub struct QueueConsumer {
    /// Consumer name (for logging and monitoring)
    name: String,

    /// Queue to consume from
    queue: Arc<dyn TicketQueue>,

    /// Worker that processes each message
    worker: Arc<ProcessingWorker>,

    /// Shutdown signal receiver
    shutdown: broadcast::Receiver<()>,

    /// Retry delay on connection failure (default: 5 seconds)
    retry_delay: Duration,
}

impl QueueConsumer {
    /// Create a new consumer with the default retry delay.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        queue: Arc<dyn TicketQueue>,
        worker: Arc<ProcessingWorker>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            worker,
            shutdown,
            retry_delay: Duration::from_secs(5),
        }
    }

    /// Create a builder for configuring a consumer.
    #[must_use]
    pub fn builder() -> QueueConsumerBuilder {
        QueueConsumerBuilder::default()
    }

    /// Spawn the consumer as a background task.
    ///
    /// Returns a `JoinHandle` that resolves when the consumer shuts down.
    #[must_use]
    pub fn spawn(mut self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&mut self) {
        info!(consumer = %self.name, "Queue consumer started");

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    info!(consumer = %self.name, "Queue consumer received shutdown signal");
                    break;
                }
                subscribe_result = self.queue.subscribe() => {
                    match subscribe_result {
                        Ok(mut stream) => {
                            info!(consumer = %self.name, "Subscribed to ticket queue");

                            if self.process_stream(&mut stream).await {
                                // Shutdown requested during processing
                                break;
                            }

                            warn!(
                                consumer = %self.name,
                                "Message stream ended, reconnecting in {:?}",
                                self.retry_delay
                            );
                            tokio::time::sleep(self.retry_delay).await;
                        }
                        Err(e) => {
                            error!(
                                consumer = %self.name,
                                error = %e,
                                "Failed to subscribe to ticket queue, retrying in {:?}",
                                self.retry_delay
                            );
                            tokio::time::sleep(self.retry_delay).await;
                        }
                    }
                }
            }
        }

        info!(consumer = %self.name, "Queue consumer stopped");
    }

    /// Process messages until the stream ends or shutdown is requested.
    ///
    /// Returns `true` if a shutdown signal was received.
    async fn process_stream(&mut self, stream: &mut MessageStream) -> bool {
        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    info!(consumer = %self.name, "Shutdown signal received during processing");
                    return true;
                }
                next = stream.next() => {
                    match next {
                        Some(Ok(message)) => {
                            if let Err(e) = self.worker.process_message(&message).await {
                                error!(
                                    consumer = %self.name,
                                    ticket_id = %message.ticket_id,
                                    error = %e,
                                    "Failed to process message"
                                );
                                // Continue with subsequent messages; the
                                // queue's redelivery policy owns retries.
                            }
                        }
                        Some(Err(e)) => {
                            error!(consumer = %self.name, error = %e, "Error receiving message");
                        }
                        None => {
                            warn!(consumer = %self.name, "Message stream ended");
                            return false;
                        }
                    }
                }
            }
        }
    }
}

/// Builder for configuring a [`QueueConsumer`].
#[derive(Default)]
pub struct QueueConsumerBuilder {
    name: Option<String>,
    queue: Option<Arc<dyn TicketQueue>>,
    worker: Option<Arc<ProcessingWorker>>,
    shutdown: Option<broadcast::Receiver<()>>,
    retry_delay: Option<Duration>,
}

impl QueueConsumerBuilder {
    /// Set consumer name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the queue to consume from.
    #[must_use]
    pub fn queue(mut self, queue: Arc<dyn TicketQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the processing worker.
    #[must_use]
    pub fn worker(mut self, worker: Arc<ProcessingWorker>) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Set the shutdown signal receiver.
    #[must_use]
    pub fn shutdown(mut self, shutdown: broadcast::Receiver<()>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Set a custom retry delay (default: 5 seconds).
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Build the [`QueueConsumer`].
    ///
    /// # Panics
    ///
    /// Panics if required fields are not set (name, queue, worker, shutdown).
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn build(self) -> QueueConsumer {
        QueueConsumer {
            name: self.name.expect("name is required"),
            queue: self.queue.expect("queue is required"),
            worker: self.worker.expect("worker is required"),
            shutdown: self.shutdown.expect("shutdown is required"),
            retry_delay: self.retry_delay.unwrap_or_else(|| Duration::from_secs(5)),
        }
    }
}
