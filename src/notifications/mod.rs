//! Customer notification dispatch
//!
//! A thin seam over SMS and email delivery. The dispatcher is constructed
//! once at startup and passed to consumers; delivery failures are logged and
//! never propagated to the caller's request lifecycle.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

/// Delivery channel for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    Email,
}

/// What the message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    BookingConfirmation,
    PaymentReceived,
    PaymentFailed,
}

/// Message envelope handed to the dispatcher
#[derive(Debug, Clone)]
pub struct MessageEnvelope {
    pub kind: NotificationKind,
    pub channel: Channel,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("no channel registered for {0:?}")]
    ChannelUnavailable(Channel),

    #[error("invalid recipient '{recipient}'")]
    InvalidRecipient { recipient: String },

    #[error("delivery failed on {channel:?}: {message}")]
    Delivery { channel: Channel, message: String },
}

/// A transport capable of delivering one kind of channel
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn channel(&self) -> Channel;

    async fn deliver(&self, message: &MessageEnvelope) -> Result<(), NotificationError>;
}

/// Log-backed email transport
///
/// Stands in for a real mail provider; records the delivery in the service
/// log so the flow is observable end to end.
pub struct LogEmailChannel {
    pub sender: String,
}

#[async_trait]
impl NotificationChannel for LogEmailChannel {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn deliver(&self, message: &MessageEnvelope) -> Result<(), NotificationError> {
        if !message.recipient.contains('@') {
            return Err(NotificationError::InvalidRecipient {
                recipient: message.recipient.clone(),
            });
        }
        info!(
            "Email dispatched: from={} to={} subject={}",
            self.sender, message.recipient, message.subject
        );
        Ok(())
    }
}

/// Log-backed SMS transport
pub struct LogSmsChannel {
    pub sender_id: String,
}

#[async_trait]
impl NotificationChannel for LogSmsChannel {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn deliver(&self, message: &MessageEnvelope) -> Result<(), NotificationError> {
        if message.recipient.trim().is_empty() {
            return Err(NotificationError::InvalidRecipient {
                recipient: message.recipient.clone(),
            });
        }
        info!(
            "SMS dispatched: sender={} to={}",
            self.sender_id, message.recipient
        );
        Ok(())
    }
}

/// Routes envelopes to the matching channel transport
pub struct NotificationDispatcher {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Attempt delivery; failures are logged, never returned
    pub async fn dispatch(&self, message: MessageEnvelope) {
        let result = match self
            .channels
            .iter()
            .find(|c| c.channel() == message.channel)
        {
            Some(channel) => channel.deliver(&message).await,
            None => Err(NotificationError::ChannelUnavailable(message.channel)),
        };

        if let Err(e) = result {
            error!(
                "Notification delivery failed: kind={:?} recipient={}: {}",
                message.kind, message.recipient, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingChannel;

    #[async_trait]
    impl NotificationChannel for FailingChannel {
        fn channel(&self) -> Channel {
            Channel::Email
        }

        async fn deliver(&self, _message: &MessageEnvelope) -> Result<(), NotificationError> {
            Err(NotificationError::Delivery {
                channel: Channel::Email,
                message: "provider down".to_string(),
            })
        }
    }

    fn envelope(channel: Channel, recipient: &str) -> MessageEnvelope {
        MessageEnvelope {
            kind: NotificationKind::PaymentReceived,
            channel,
            recipient: recipient.to_string(),
            subject: "Payment received".to_string(),
            body: "Your transfer is confirmed.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_matching_channel() {
        let dispatcher = NotificationDispatcher::new(vec![
            Box::new(LogEmailChannel {
                sender: "bookings@skytransfer.example".to_string(),
            }),
            Box::new(LogSmsChannel {
                sender_id: "SKYTRNSFR".to_string(),
            }),
        ]);

        dispatcher.dispatch(envelope(Channel::Email, "ahmet@email.com")).await;
        dispatcher.dispatch(envelope(Channel::Sms, "+905551112233")).await;
    }

    #[tokio::test]
    async fn test_dispatch_swallows_delivery_failure() {
        let dispatcher = NotificationDispatcher::new(vec![Box::new(FailingChannel)]);
        // Must not panic or propagate.
        dispatcher.dispatch(envelope(Channel::Email, "ahmet@email.com")).await;
    }

    #[tokio::test]
    async fn test_dispatch_handles_missing_channel() {
        let dispatcher = NotificationDispatcher::new(vec![]);
        dispatcher.dispatch(envelope(Channel::Sms, "+905551112233")).await;
    }

    #[tokio::test]
    async fn test_email_channel_rejects_bad_recipient() {
        let channel = LogEmailChannel {
            sender: "bookings@skytransfer.example".to_string(),
        };
        let result = channel.deliver(&envelope(Channel::Email, "not-an-address")).await;
        assert!(matches!(
            result,
            Err(NotificationError::InvalidRecipient { .. })
        ));
    }
}
