//! Production notifier.
//!
//! The chat transport adapter is wired in deployment; the binary itself ships
//! with a notifier that emits every outbound message as a structured log
//! line, which is also what operators want when running without a transport.

use async_trait::async_trait;

use moondust_core::model::ActorId;
use moondust_core::notify::{Notifier, NotifyError, Outbound};

/// Logs outbound messages instead of delivering them.
#[derive(Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send(&self, recipient: ActorId, message: Outbound) -> Result<(), NotifyError> {
        tracing::info!(
            %recipient,
            text = %message.text,
            buttons = message.buttons.len(),
            "outbound message"
        );
        Ok(())
    }
}
