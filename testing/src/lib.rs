//! Testing utilities for the warranty exchange pipeline.
//!
//! In-memory implementations of the core trait boundaries, with failure
//! injection so tests can exercise the pipeline's partial-failure paths:
//!
//! - [`InMemoryTicketStore`]: keyed store over a `HashMap`
//! - [`InMemoryTicketQueue`]: channel-backed queue with a drainable buffer
//! - [`RecordingNotifier`]: captures every notification for assertions
//! - [`mocks::FixedClock`]: deterministic time
//! - [`payload::valid_payload`]: a complete, valid intake payload builder

pub mod notifier;
pub mod queue;
pub mod store;

pub use notifier::RecordingNotifier;
pub use queue::InMemoryTicketQueue;
pub use store::InMemoryTicketStore;

/// Mock implementations for testing.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use warranty_exchange_core::environment::Clock;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Intake payload builders.
pub mod payload {
    use serde_json::{Value, json};

    /// A complete, valid intake payload.
    ///
    /// Purchase date is recent relative to [`mocks::test_clock`] so the
    /// ticket lands inside the warranty window.
    ///
    /// [`mocks::test_clock`]: crate::mocks::test_clock
    #[must_use]
    pub fn valid_payload() -> Value {
        json!({
            "full_name": "Maria Silva",
            "national_id": "123.456.789-09",
            "email": "maria@example.com",
            "phone": "+55 11 91234-5678",
            "address": {
                "street": "Rua das Flores",
                "number": "42",
                "city": "Sao Paulo",
                "state": "SP",
                "postal_code": "01310-100"
            },
            "device": {
                "brand": "Acme",
                "model": "Photon X",
                "serial_number": "SN12345",
                "purchase_date": "2025-11-20",
                "invoice_reference": "NF-0001"
            },
            "notes": "screen flickers"
        })
    }

    /// A valid payload with the given device field overridden.
    #[must_use]
    pub fn payload_with_device_field(field: &str, value: &str) -> Value {
        let mut payload = valid_payload();
        payload["device"][field] = json!(value);
        payload
    }
}

/// Initialize a compact tracing subscriber for tests.
///
/// Safe to call from multiple tests; only the first call installs the
/// subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
