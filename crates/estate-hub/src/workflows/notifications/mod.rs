//! Persisted notifications, chat messages, and their best-effort live delivery.

pub mod dispatcher;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use dispatcher::NotificationDispatcher;
pub use domain::{
    ChatMessage, LiveEvent, MessageId, Notification, NotificationId, NotificationKind,
};
pub use repository::{LiveChannel, LiveChannelError, MessageRepository, NotificationRepository};
pub use router::notification_router;
pub use service::NotificationService;
