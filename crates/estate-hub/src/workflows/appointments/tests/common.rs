use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::error::RepositoryError;
use crate::identity::{Actor, UserId};
use crate::workflows::appointments::{
    Appointment, AppointmentId, AppointmentRepository, AppointmentService, AppointmentStatus,
    ProposeRequest,
};
use crate::workflows::fixtures::Harness;
use crate::workflows::listings::{Property, PropertyId};
use crate::workflows::memory::{InMemoryStore, RecordingLiveChannel};
use crate::workflows::notifications::{
    Notification, NotificationDispatcher, NotificationId, NotificationRepository,
};

pub(super) fn owner() -> Actor {
    Actor::owner("owner-1")
}

pub(super) fn tenant() -> Actor {
    Actor::client("tenant-1")
}

pub(super) fn listed(harness: &Harness) -> Property {
    harness.publish(&owner(), "Sunny two-bedroom", 950.0, json!([]))
}

pub(super) fn proposal(property: &Property, tenant: &Actor, slots: &[&str]) -> ProposeRequest {
    ProposeRequest {
        property_id: property.id.clone(),
        tenant_id: tenant.id.clone(),
        available_slots: slots.iter().map(|slot| slot.to_string()).collect(),
    }
}

pub(super) fn proposed(
    harness: &Harness,
    property: &Property,
    tenant: &Actor,
    slots: &[&str],
) -> Appointment {
    harness
        .market
        .appointments
        .propose(&owner(), proposal(property, tenant, slots))
        .expect("proposal accepted")
}

/// Notification store that is always down.
pub(super) struct OfflineNotifications;

impl NotificationRepository for OfflineNotifications {
    fn insert(&self, _notification: Notification) -> Result<Notification, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn update(&self, _notification: Notification) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn fetch(&self, _id: &NotificationId) -> Result<Option<Notification>, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn delete(&self, _id: &NotificationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }

    fn for_recipient(&self, _recipient: &UserId) -> Result<Vec<Notification>, RepositoryError> {
        Err(RepositoryError::Unavailable("notification store offline".to_string()))
    }
}

/// Appointment service whose notifications cannot be persisted.
pub(super) fn service_without_notifications(store: &InMemoryStore) -> AppointmentService {
    let store = Arc::new(store.clone());
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(OfflineNotifications),
        store.clone(),
        Arc::new(RecordingLiveChannel::new()),
    ));
    AppointmentService::new(store.clone(), store, dispatcher)
}

/// Appointment store that hands out one outdated copy of an appointment before reading through,
/// as a request that loaded the record just before another request changed it would see.
pub(super) struct LaggingAppointments {
    store: InMemoryStore,
    outdated: Mutex<Option<Appointment>>,
}

impl LaggingAppointments {
    pub(super) fn new(store: &InMemoryStore, outdated: Appointment) -> Self {
        Self {
            store: store.clone(),
            outdated: Mutex::new(Some(outdated)),
        }
    }

    fn take_outdated(&self, id: &AppointmentId) -> Option<Appointment> {
        let mut outdated = self.outdated.lock().expect("outdated copy lock");
        match outdated.as_ref() {
            Some(appointment) if appointment.id == *id => outdated.take(),
            _ => None,
        }
    }
}

impl AppointmentRepository for LaggingAppointments {
    fn insert(&self, appointment: Appointment) -> Result<Appointment, RepositoryError> {
        AppointmentRepository::insert(&self.store, appointment)
    }

    fn fetch(&self, id: &AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
        match self.take_outdated(id) {
            Some(appointment) => Ok(Some(appointment)),
            None => AppointmentRepository::fetch(&self.store, id),
        }
    }

    fn for_property(&self, property_id: &PropertyId) -> Result<Vec<Appointment>, RepositoryError> {
        let mut appointments = self.store.for_property(property_id)?;
        for appointment in appointments.iter_mut() {
            if let Some(outdated) = self.take_outdated(&appointment.id) {
                *appointment = outdated;
            }
        }
        Ok(appointments)
    }

    fn for_participant(&self, user: &UserId) -> Result<Vec<Appointment>, RepositoryError> {
        AppointmentRepository::for_participant(&self.store, user)
    }

    fn commit_confirmation(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, RepositoryError> {
        self.store.commit_confirmation(appointment)
    }

    fn commit_transition(
        &self,
        appointment: Appointment,
        expected_from: AppointmentStatus,
    ) -> Result<Appointment, RepositoryError> {
        self.store.commit_transition(appointment, expected_from)
    }
}

/// Appointment service reading through [`LaggingAppointments`] over the harness store.
pub(super) fn lagging_service(harness: &Harness, outdated: Appointment) -> AppointmentService {
    AppointmentService::new(
        Arc::new(LaggingAppointments::new(&harness.store, outdated)),
        Arc::new(harness.store.clone()),
        harness.market.dispatcher.clone(),
    )
}
