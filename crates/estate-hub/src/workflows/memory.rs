//! In-process storage backing the server, the demo, and the test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::RepositoryError;
use crate::identity::UserId;
use crate::workflows::appointments::{
    Appointment, AppointmentId, AppointmentRepository, AppointmentStatus,
};
use crate::workflows::listings::{
    Favorite, FavoriteRepository, ProfileRepository, Property, PropertyId, PropertyRepository,
};
use crate::workflows::matching::ClientPreferences;
use crate::workflows::notifications::{
    ChatMessage, LiveChannel, LiveChannelError, LiveEvent, MessageRepository, Notification,
    NotificationId, NotificationRepository,
};

#[derive(Default)]
struct State {
    properties: Vec<Property>,
    favorites: Vec<Favorite>,
    preferences: HashMap<UserId, ClientPreferences>,
    appointments: Vec<Appointment>,
    notifications: Vec<Notification>,
    messages: Vec<ChatMessage>,
}

/// Every repository over one mutex-guarded state, so cross-entity checks are atomic.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    /// Every stored chat message, oldest first.
    pub fn messages(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self.lock()?.messages.clone())
    }

    /// Favorites across all users and properties.
    pub fn all_favorites(&self) -> Result<Vec<Favorite>, RepositoryError> {
        Ok(self.lock()?.favorites.clone())
    }
}

impl PropertyRepository for InMemoryStore {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut state = self.lock()?;
        if state.properties.iter().any(|stored| stored.id == property.id) {
            return Err(RepositoryError::Conflict);
        }
        state.properties.push(property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let slot = state
            .properties
            .iter_mut()
            .find(|stored| stored.id == property.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = property;
        Ok(())
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.properties.iter().find(|stored| stored.id == *id).cloned())
    }

    fn list_active(&self) -> Result<Vec<Property>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .properties
            .iter()
            .filter(|property| property.is_active())
            .cloned()
            .collect())
    }
}

impl FavoriteRepository for InMemoryStore {
    fn add(&self, favorite: Favorite) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let exists = state.favorites.iter().any(|stored| {
            stored.user == favorite.user && stored.property_id == favorite.property_id
        });
        if !exists {
            state.favorites.push(favorite);
        }
        Ok(!exists)
    }

    fn remove(&self, user: &UserId, property_id: &PropertyId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let before = state.favorites.len();
        state
            .favorites
            .retain(|stored| !(stored.user == *user && stored.property_id == *property_id));
        Ok(state.favorites.len() != before)
    }

    fn for_user(&self, user: &UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .favorites
            .iter()
            .filter(|favorite| favorite.user == *user)
            .cloned()
            .collect())
    }

    fn remove_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<Favorite>, RepositoryError> {
        let mut state = self.lock()?;
        let (removed, kept): (Vec<Favorite>, Vec<Favorite>) = std::mem::take(&mut state.favorites)
            .into_iter()
            .partition(|favorite| favorite.property_id == *property_id);
        state.favorites = kept;
        Ok(removed)
    }
}

impl ProfileRepository for InMemoryStore {
    fn preferences(&self, user: &UserId) -> Result<Option<ClientPreferences>, RepositoryError> {
        Ok(self.lock()?.preferences.get(user).cloned())
    }

    fn save_preferences(
        &self,
        user: &UserId,
        preferences: ClientPreferences,
    ) -> Result<(), RepositoryError> {
        self.lock()?.preferences.insert(user.clone(), preferences);
        Ok(())
    }
}

impl AppointmentRepository for InMemoryStore {
    fn insert(&self, appointment: Appointment) -> Result<Appointment, RepositoryError> {
        let mut state = self.lock()?;
        if state.appointments.iter().any(|stored| stored.id == appointment.id) {
            return Err(RepositoryError::Conflict);
        }
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    fn fetch(&self, id: &AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.appointments.iter().find(|stored| stored.id == *id).cloned())
    }

    fn for_property(&self, property_id: &PropertyId) -> Result<Vec<Appointment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .appointments
            .iter()
            .filter(|appointment| appointment.property_id == *property_id)
            .cloned()
            .collect())
    }

    fn for_participant(&self, user: &UserId) -> Result<Vec<Appointment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .appointments
            .iter()
            .filter(|appointment| appointment.participant(user).is_some())
            .cloned()
            .collect())
    }

    fn commit_confirmation(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, RepositoryError> {
        let mut state = self.lock()?;

        let stored = state
            .appointments
            .iter()
            .find(|stored| stored.id == appointment.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != AppointmentStatus::Pending {
            return Err(RepositoryError::Conflict);
        }

        let taken = state.appointments.iter().any(|other| {
            other.id != appointment.id
                && other.property_id == appointment.property_id
                && other.status == AppointmentStatus::Confirmed
                && other.selected_slot.is_some()
                && other.selected_slot == appointment.selected_slot
        });
        if taken {
            return Err(RepositoryError::SlotTaken);
        }

        if let Some(slot) = state
            .appointments
            .iter_mut()
            .find(|stored| stored.id == appointment.id)
        {
            *slot = appointment.clone();
        }
        Ok(appointment)
    }

    fn commit_transition(
        &self,
        appointment: Appointment,
        expected_from: AppointmentStatus,
    ) -> Result<Appointment, RepositoryError> {
        let mut state = self.lock()?;
        let stored = state
            .appointments
            .iter_mut()
            .find(|stored| stored.id == appointment.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != expected_from {
            return Err(RepositoryError::Conflict);
        }
        *stored = appointment.clone();
        Ok(appointment)
    }
}

impl NotificationRepository for InMemoryStore {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError> {
        let mut state = self.lock()?;
        if state.notifications.iter().any(|stored| stored.id == notification.id) {
            return Err(RepositoryError::Conflict);
        }
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    fn update(&self, notification: Notification) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let slot = state
            .notifications
            .iter_mut()
            .find(|stored| stored.id == notification.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = notification;
        Ok(())
    }

    fn fetch(&self, id: &NotificationId) -> Result<Option<Notification>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.notifications.iter().find(|stored| stored.id == *id).cloned())
    }

    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let before = state.notifications.len();
        state.notifications.retain(|stored| stored.id != *id);
        if state.notifications.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn for_recipient(&self, recipient: &UserId) -> Result<Vec<Notification>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .notifications
            .iter()
            .filter(|notification| notification.recipient == *recipient)
            .cloned()
            .collect())
    }
}

impl MessageRepository for InMemoryStore {
    fn insert(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError> {
        let mut state = self.lock()?;
        state.messages.push(message.clone());
        Ok(message)
    }

    fn for_participant(&self, user: &UserId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .messages
            .iter()
            .filter(|message| message.sender == *user || message.receiver == *user)
            .cloned()
            .collect())
    }
}

/// Live channel that keeps every published event, or rejects them all when built with
/// [`RecordingLiveChannel::failing`].
#[derive(Default, Clone)]
pub struct RecordingLiveChannel {
    events: Arc<Mutex<Vec<(UserId, LiveEvent)>>>,
    fail: bool,
}

impl RecordingLiveChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Arc::default(),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<(UserId, LiveEvent)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events delivered to one user, in publish order.
    pub fn events_for(&self, user: &UserId) -> Vec<LiveEvent> {
        self.events()
            .into_iter()
            .filter(|(recipient, _)| recipient == user)
            .map(|(_, event)| event)
            .collect()
    }
}

impl LiveChannel for RecordingLiveChannel {
    fn publish(&self, recipient: &UserId, event: LiveEvent) -> Result<(), LiveChannelError> {
        if self.fail {
            return Err(LiveChannelError::Unavailable("recording channel offline".to_string()));
        }
        self.events
            .lock()
            .map_err(|_| LiveChannelError::Closed)?
            .push((recipient.clone(), event));
        Ok(())
    }
}
