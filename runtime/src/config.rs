//! Configuration management for the pipeline runtime.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use warranty_exchange_core::notifier::{LogNotifier, NoopNotifier, Notifier};

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Queue consumer configuration
    pub consumer: ConsumerConfig,
    /// Notification configuration
    pub notifications: NotificationConfig,
}

/// Queue consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Consumer name used in logs
    pub name: String,
    /// Delay before resubscribing after a stream failure, in seconds
    pub retry_delay_secs: u64,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether a notification channel is configured; when `false` every
    /// send is a no-op
    pub enabled: bool,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            consumer: ConsumerConfig {
                name: env::var("CONSUMER_NAME")
                    .unwrap_or_else(|_| "ticket-processing".to_string()),
                retry_delay_secs: env::var("CONSUMER_RETRY_DELAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
            notifications: NotificationConfig {
                enabled: env::var("NOTIFICATIONS_ENABLED")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
        }
    }
}

impl NotificationConfig {
    /// Build the notifier this configuration selects: the log-backed
    /// channel when enabled, otherwise the documented no-op.
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        if self.enabled {
            Arc::new(LogNotifier)
        } else {
            Arc::new(NoopNotifier)
        }
    }
}
