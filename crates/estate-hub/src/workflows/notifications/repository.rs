use crate::error::RepositoryError;
use crate::identity::UserId;

use super::domain::{ChatMessage, LiveEvent, Notification, NotificationId};

/// Durable notification storage.
pub trait NotificationRepository: Send + Sync {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError>;
    fn update(&self, notification: Notification) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &NotificationId) -> Result<Option<Notification>, RepositoryError>;
    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError>;
    fn for_recipient(&self, recipient: &UserId) -> Result<Vec<Notification>, RepositoryError>;
}

/// Durable chat message storage.
pub trait MessageRepository: Send + Sync {
    fn insert(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError>;
    fn for_participant(&self, user: &UserId) -> Result<Vec<ChatMessage>, RepositoryError>;
}

/// Directed publish to a user's private channel. Transport is owned elsewhere.
pub trait LiveChannel: Send + Sync {
    fn publish(&self, recipient: &UserId, event: LiveEvent) -> Result<(), LiveChannelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LiveChannelError {
    #[error("live channel closed")]
    Closed,
    #[error("live channel unavailable: {0}")]
    Unavailable(String),
}
