//! Test notifiers — mock `Notifier` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use moondust_core::model::ActorId;
use moondust_core::notify::{Notifier, NotifyError, Outbound};

/// A notifier that records every message it is asked to deliver and always
/// reports success.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ActorId, Outbound)>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all messages sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<(ActorId, Outbound)> {
        self.sent.lock().unwrap().clone()
    }

    /// Returns the messages sent to one recipient.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent_to(&self, recipient: ActorId) -> Vec<Outbound> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == recipient)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: ActorId, message: Outbound) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push((recipient, message));
        Ok(())
    }
}

/// A notifier that always fails delivery. Useful for asserting that decision
/// paths never roll back on notification failure.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _recipient: ActorId, _message: Outbound) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("recipient blocked the bot".into()))
    }
}
