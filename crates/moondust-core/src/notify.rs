//! Outbound message seam.
//!
//! The chat transport is an external collaborator; the domain only knows how
//! to hand it a message for a recipient. Delivery failures are the caller's
//! problem to swallow: a failed notification must never roll back the state
//! transition that triggered it.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::ActorId;

/// A message ready for the transport to render: text plus the encoded action
/// payloads of any buttons that accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// Message text.
    pub text: String,
    /// Encoded action payloads, one per button, in display order.
    pub buttons: Vec<String>,
}

impl Outbound {
    /// A plain text message with no buttons.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// A message with buttons.
    #[must_use]
    pub fn with_buttons(text: impl Into<String>, buttons: Vec<String>) -> Self {
        Self {
            text: text.into(),
            buttons,
        }
    }
}

/// Delivery error reported by the transport.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The counterpart could not be reached (blocked the bot, left, etc.).
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Sends messages to actors through the chat transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a message to one recipient.
    async fn send(&self, recipient: ActorId, message: Outbound) -> Result<(), NotifyError>;
}
