//! # Warranty Exchange Runtime
//!
//! The imperative shell around the pure core: the synchronous intake
//! service, the asynchronous processing worker, and the queue consumer loop
//! that connects the worker to an at-least-once message queue.
//!
//! Data flow:
//!
//! ```text
//! caller → IntakeService → (TicketStore.create, TicketQueue.enqueue)
//!            │
//!            ▼  [queue, at-least-once]
//!        QueueConsumer → ProcessingWorker → eligibility::decide
//!                                        → TicketStore.update
//!                                        → Notifier.notify
//! ```
//!
//! Every collaborator is injected as a trait object, so the whole pipeline
//! runs unchanged against the in-memory fakes from
//! `warranty-exchange-testing` or against real queue/store adapters.

pub mod config;
pub mod consumer;
pub mod intake;
pub mod worker;

pub use config::Config;
pub use consumer::QueueConsumer;
pub use intake::{IntakeError, IntakeResponse, IntakeService, TicketOpened};
pub use worker::{BatchOutcome, ProcessingError, ProcessingWorker};
