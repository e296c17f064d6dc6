use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::listings::PropertyId;

/// Identifier wrapper for notifications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of notification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Interest,
    Appointment,
    PropertyRemoved,
    Favorite,
    Message,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Interest => "interest",
            Self::Appointment => "appointment",
            Self::PropertyRemoved => "property_removed",
            Self::Favorite => "favorite",
            Self::Message => "message",
        }
    }
}

/// Recipient-addressed record of something that happened to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserId>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub reference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Identifier wrapper for chat messages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// A message on the conversation thread attached to a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: UserId,
    pub receiver: UserId,
    pub property_id: PropertyId,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Event pushed to a user's private live channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum LiveEvent {
    #[serde(rename = "notification")]
    Notification(Notification),
    #[serde(rename = "newMessage")]
    NewMessage(ChatMessage),
}

impl LiveEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Notification(_) => "notification",
            Self::NewMessage(_) => "newMessage",
        }
    }
}
