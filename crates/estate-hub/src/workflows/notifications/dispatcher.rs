use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::RepositoryError;
use crate::identity::UserId;
use crate::workflows::listings::PropertyId;

use super::domain::{
    ChatMessage, LiveEvent, MessageId, Notification, NotificationId, NotificationKind,
};
use super::repository::{LiveChannel, MessageRepository, NotificationRepository};

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

fn next_message_id() -> MessageId {
    let id = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MessageId(format!("msg-{id:06}"))
}

/// Persists notifications and chat messages, then pushes them to the live channel.
///
/// The stored record is the source of truth. A failed live publish is logged and otherwise
/// ignored; recipients still see the record when they next list their notifications.
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    messages: Arc<dyn MessageRepository>,
    live: Arc<dyn LiveChannel>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        messages: Arc<dyn MessageRepository>,
        live: Arc<dyn LiveChannel>,
    ) -> Self {
        Self {
            notifications,
            messages,
            live,
        }
    }

    pub fn notify(
        &self,
        recipient: &UserId,
        sender: Option<&UserId>,
        kind: NotificationKind,
        reference_id: &str,
        message: Option<String>,
    ) -> Result<Notification, RepositoryError> {
        let notification = Notification {
            id: next_notification_id(),
            recipient: recipient.clone(),
            sender: sender.cloned(),
            kind,
            reference_id: reference_id.to_string(),
            message,
            read: false,
            created_at: Utc::now(),
        };

        let stored = self.notifications.insert(notification)?;
        self.publish(recipient, LiveEvent::Notification(stored.clone()));
        Ok(stored)
    }

    /// Post a message on the property's conversation thread and echo it to both participants.
    pub fn post_chat_message(
        &self,
        sender: &UserId,
        receiver: &UserId,
        property_id: &PropertyId,
        content: impl Into<String>,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage {
            id: next_message_id(),
            sender: sender.clone(),
            receiver: receiver.clone(),
            property_id: property_id.clone(),
            content: content.into(),
            read: false,
            created_at: Utc::now(),
        };

        let stored = self.messages.insert(message)?;
        self.publish(sender, LiveEvent::NewMessage(stored.clone()));
        self.publish(receiver, LiveEvent::NewMessage(stored.clone()));
        Ok(stored)
    }

    fn publish(&self, recipient: &UserId, event: LiveEvent) {
        let name = event.name();
        match self.live.publish(recipient, event) {
            Ok(()) => debug!(%recipient, event = name, "live event published"),
            Err(err) => warn!(%recipient, event = name, error = %err, "live event dropped"),
        }
    }
}

/// Swallow a failed side effect after logging it; the primary transition already succeeded.
pub(crate) fn best_effort<T>(
    effect: &'static str,
    result: Result<T, RepositoryError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(effect, error = %err, "side effect failed");
            None
        }
    }
}
