use std::sync::Arc;

use crate::error::ServiceError;
use crate::identity::Actor;

use super::domain::{Notification, NotificationId};
use super::repository::NotificationRepository;

/// Recipient-facing reads and the few mutations allowed on notifications.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Newest first.
    pub fn list(&self, actor: &Actor) -> Result<Vec<Notification>, ServiceError> {
        let mut notifications = self.repository.for_recipient(&actor.id)?;
        notifications.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(notifications)
    }

    pub fn mark_read(
        &self,
        actor: &Actor,
        id: &NotificationId,
    ) -> Result<Notification, ServiceError> {
        let mut notification = self.owned(actor, id)?;
        if !notification.read {
            notification.read = true;
            self.repository.update(notification.clone())?;
        }
        Ok(notification)
    }

    pub fn mark_all_read(&self, actor: &Actor) -> Result<usize, ServiceError> {
        let mut updated = 0;
        for mut notification in self.repository.for_recipient(&actor.id)? {
            if notification.read {
                continue;
            }
            notification.read = true;
            self.repository.update(notification)?;
            updated += 1;
        }
        Ok(updated)
    }

    pub fn delete(&self, actor: &Actor, id: &NotificationId) -> Result<(), ServiceError> {
        self.owned(actor, id)?;
        self.repository.delete(id)?;
        Ok(())
    }

    fn owned(&self, actor: &Actor, id: &NotificationId) -> Result<Notification, ServiceError> {
        let notification = self
            .repository
            .fetch(id)?
            .ok_or_else(|| ServiceError::not_found("Notification not found"))?;
        if notification.recipient != actor.id {
            return Err(ServiceError::forbidden(
                "You can only manage your own notifications",
            ));
        }
        Ok(notification)
    }
}
