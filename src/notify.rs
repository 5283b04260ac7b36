//! Queue position notices.
//!
//! The transport is pluggable through [`PositionNotifier`]. Delivery
//! failures are logged by [`announce_position`] and never reach the
//! ordering or storage layers.

use tracing::{info, warn};

use crate::error::Result;

/// A "you are number N of M" notice for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePositionMessage {
    /// Recipient address.
    pub recipient: String,
    /// Recipient display name.
    pub name: String,
    /// 1-based position in the queue.
    pub position: usize,
    /// Queue length at the time of the notice.
    pub total: usize,
}

impl QueuePositionMessage {
    /// Creates a notice for `recipient` at 1-based `position` of `total`.
    pub fn new(
        recipient: impl Into<String>,
        name: impl Into<String>,
        position: usize,
        total: usize,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            name: name.into(),
            position,
            total,
        }
    }

    /// Subject line.
    pub fn subject(&self) -> String {
        format!("Your Queue Position: #{} - Order Confirmation", self.position)
    }

    /// Plain-text body.
    pub fn body(&self) -> String {
        format!(
            "Dear {name},\n\n\
             Thank you for submitting your order request.\n\n\
             Your application has been received and processed successfully.\n\
             Based on our priority system, your current position in the queue is:\n\n\
             Queue Position: {position} out of {total} customers\n\n\
             We will notify you when it's your turn.\n\n\
             Best regards,\n\
             Customer Service Team",
            name = self.name,
            position = self.position,
            total = self.total,
        )
    }
}

/// Delivers queue position notices.
pub trait PositionNotifier {
    /// Sends one notice. Errors are reported, not retried.
    fn notify(&self, message: &QueuePositionMessage) -> Result<()>;
}

/// Notifier that writes notices to the `tracing` log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl PositionNotifier for LogNotifier {
    fn notify(&self, message: &QueuePositionMessage) -> Result<()> {
        info!(
            recipient = %message.recipient,
            position = message.position,
            total = message.total,
            subject = %message.subject(),
            "queue position notice"
        );
        Ok(())
    }
}

/// Sends a notice, logging and swallowing any failure.
///
/// Returns whether the notifier accepted the message.
pub fn announce_position<N>(notifier: &N, message: &QueuePositionMessage) -> bool
where
    N: PositionNotifier + ?Sized,
{
    match notifier.notify(message) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                recipient = %message.recipient,
                position = message.position,
                error = %err,
                "failed to send queue position notice"
            );
            false
        }
    }
}
