//! # Warranty Exchange Core
//!
//! Domain model and pure business rules for the warranty exchange ticket
//! pipeline, plus the trait boundaries the pipeline runs against.
//!
//! ## Core Concepts
//!
//! - **TicketRequest**: caller-supplied intake payload, produced only by the
//!   [`validator`]
//! - **Ticket**: system-owned record tracked by a unique [`TicketId`]
//! - **Decision**: the deterministic accept/reject outcome of the
//!   [`eligibility`] engine
//! - **Boundaries**: [`store::TicketStore`], [`queue::TicketQueue`] and
//!   [`notifier::Notifier`] abstract the durable store, the at-least-once
//!   message queue and the outbound notification channel
//!
//! ## Architecture Principles
//!
//! - Functional core: validation and eligibility are pure functions
//! - Explicit dependency injection via trait objects (no global clients)
//! - Parse-then-validate: unvalidated data never reaches the eligibility
//!   engine or the store
//! - Rejection is a normal [`Decision`](eligibility::Decision), not an error

pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};

pub mod eligibility;
pub mod message;
pub mod notifier;
pub mod queue;
pub mod store;
pub mod types;
pub mod validator;

/// Environment traits for injected dependencies.
///
/// Services take their collaborators as constructor parameters so tests can
/// substitute deterministic fakes.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock abstraction for time-dependent business rules.
    ///
    /// The eligibility engine's warranty window depends on "now"; injecting
    /// the clock keeps `decide` deterministic under test.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
