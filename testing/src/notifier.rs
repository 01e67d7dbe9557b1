//! Recording notifier.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use warranty_exchange_core::eligibility::Decision;
use warranty_exchange_core::notifier::{Notification, Notifier, NotifierError};
use warranty_exchange_core::types::{Ticket, TicketId, TicketStatus};

/// One captured notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentNotification {
    /// The ticket the notification was about
    pub ticket_id: TicketId,
    /// Decision status at send time
    pub status: TicketStatus,
    /// The composed notification content
    pub notification: Notification,
}

/// [`Notifier`] that records every send for test assertions.
///
/// Sends can be forced to fail to verify the worker swallows notifier
/// errors.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    fail_sends: AtomicBool,
}

impl RecordingNotifier {
    /// Create a recording notifier that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Everything sent so far.
    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }

    /// Number of notifications sent so far.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        ticket: &Ticket,
        decision: &Decision,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifierError>> + Send + '_>> {
        let record = SentNotification {
            ticket_id: ticket.ticket_id,
            status: decision.status.into(),
            notification: Notification::compose(ticket, decision),
        };
        Box::pin(async move {
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(NotifierError::DeliveryFailed(
                    "injected send failure".to_string(),
                ));
            }
            self.sent.lock().await.push(record);
            Ok(())
        })
    }
}
