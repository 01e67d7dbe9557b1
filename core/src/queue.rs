//! Message queue abstraction between intake and processing.
//!
//! The [`TicketQueue`] trait models the at-least-once queue connecting the
//! two pipeline stages. A message may be delivered more than once but never
//! zero times (absent permanent loss), so every consumer must be idempotent;
//! nothing in the pipeline may rely on exactly-once semantics.
//!
//! The causal ordering guarantee is the only one assumed: a ticket is
//! enqueued only after it has been durably created. No ordering is assumed
//! between messages.

use crate::message::QueueMessage;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during queue operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Failed to enqueue a message.
    #[error("enqueue failed: {0}")]
    EnqueueFailed(String),

    /// Failed to subscribe to the queue.
    #[error("subscription failed: {0}")]
    SubscriptionFailed(String),

    /// Network or transport error while consuming.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Stream of messages delivered to a consumer.
///
/// Each item is a `Result` so transport errors surface in-stream without
/// tearing down the subscription.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<QueueMessage, QueueError>> + Send>>;

/// Trait for queue implementations.
///
/// # Dyn Compatibility
///
/// Methods return explicit `Pin<Box<dyn Future>>` so the trait can be used
/// as `Arc<dyn TicketQueue>` shared between the intake service and the
/// consumer loop.
pub trait TicketQueue: Send + Sync {
    /// Enqueue a message for asynchronous processing.
    ///
    /// The call blocks until the queue acknowledges the message; intake
    /// relies on this to avoid claiming success for an unqueued ticket.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::EnqueueFailed`] if the message could not be
    /// acknowledged.
    fn enqueue(
        &self,
        message: &QueueMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), QueueError>> + Send + '_>>;

    /// Subscribe to the queue and receive a stream of messages.
    ///
    /// Delivery is at-least-once: the stream may yield duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::SubscriptionFailed`] if the subscription could
    /// not be established.
    fn subscribe(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<MessageStream, QueueError>> + Send + '_>>;
}
