use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::{RepositoryError, ServiceError};
use crate::identity::{Actor, UserId};
use crate::workflows::listings::{Property, PropertyId, PropertyRepository};
use crate::workflows::notifications::dispatcher::best_effort;
use crate::workflows::notifications::{NotificationDispatcher, NotificationKind};

use super::domain::{
    format_slot, parse_slot, Appointment, AppointmentAction, AppointmentId, AppointmentStatus,
    Participant, SlotSet, TransitionError,
};
use super::repository::AppointmentRepository;

static APPOINTMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_appointment_id() -> AppointmentId {
    let id = APPOINTMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AppointmentId(format!("appt-{id:06}"))
}

/// Owner's slot proposal for a tenant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeRequest {
    pub property_id: PropertyId,
    pub tenant_id: UserId,
    #[serde(default)]
    pub available_slots: Vec<String>,
}

/// Result of cancelling a removed property's appointments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeOutcome {
    pub cancelled: Vec<Appointment>,
    /// Tenants of every appointment that was not already cancelled.
    pub affected_tenants: BTreeSet<UserId>,
}

/// Drives the appointment state machine and its notification side effects.
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    properties: Arc<dyn PropertyRepository>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        properties: Arc<dyn PropertyRepository>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            appointments,
            properties,
            dispatcher,
        }
    }

    pub fn propose(
        &self,
        actor: &Actor,
        request: ProposeRequest,
    ) -> Result<Appointment, ServiceError> {
        let property = self
            .properties
            .fetch(&request.property_id)?
            .filter(Property::is_active)
            .ok_or_else(|| ServiceError::not_found("Property not found"))?;

        if property.owner != actor.id {
            return Err(ServiceError::forbidden(
                "Only the property owner can propose appointments",
            ));
        }
        if request.tenant_id.as_str().trim().is_empty() {
            return Err(ServiceError::bad_request("A tenant is required"));
        }
        if request.tenant_id == property.owner {
            return Err(ServiceError::bad_request(
                "Owners cannot propose appointments to themselves",
            ));
        }

        let slots = SlotSet::from_raw(&request.available_slots);
        if slots.is_empty() {
            return Err(ServiceError::bad_request("No valid slots provided"));
        }
        let slot_count = slots.len();

        let appointment = Appointment::propose(
            next_appointment_id(),
            property.id.clone(),
            actor.id.clone(),
            request.tenant_id,
            slots,
            Utc::now(),
        );
        let stored = self.appointments.insert(appointment)?;

        info!(
            appointment = %stored.id,
            property = %stored.property_id,
            tenant = %stored.tenant,
            slots = slot_count,
            "appointment proposed"
        );

        best_effort(
            "notify tenant of proposal",
            self.dispatcher.notify(
                &stored.tenant,
                Some(&stored.owner),
                NotificationKind::Appointment,
                &stored.id.0,
                Some(format!(
                    "New appointment proposal for \"{}\" with {} available slot(s)",
                    property.title, slot_count
                )),
            ),
        );

        Ok(stored)
    }

    pub fn confirm(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        selected_slot: &str,
    ) -> Result<Appointment, ServiceError> {
        let mut appointment = self.load(id)?;
        if appointment.tenant != actor.id {
            return Err(ServiceError::forbidden(
                "Only the invited tenant can confirm this appointment",
            ));
        }

        appointment
            .status
            .next(AppointmentAction::Confirm)
            .map_err(transition_error)?;

        let slot = parse_slot(selected_slot)
            .ok_or_else(|| ServiceError::bad_request("Invalid slot"))?;
        if !appointment.offers(&slot) {
            return Err(ServiceError::bad_request(
                "Selected slot is not among the proposed options",
            ));
        }

        appointment
            .confirm(slot, Utc::now())
            .map_err(transition_error)?;
        let stored = self
            .appointments
            .commit_confirmation(appointment)
            .map_err(|err| match err {
                RepositoryError::SlotTaken => {
                    ServiceError::bad_request("This slot is already booked for this property")
                }
                RepositoryError::Conflict => ServiceError::bad_request(
                    "Appointment is no longer pending and cannot be confirmed",
                ),
                other => ServiceError::from(other),
            })?;

        info!(
            appointment = %stored.id,
            property = %stored.property_id,
            slot = %slot,
            "appointment confirmed"
        );

        let title = self.property_title(&stored.property_id);
        let text = format!(
            "Appointment confirmed for \"{}\" on {}",
            title,
            format_slot(&slot)
        );
        best_effort(
            "notify owner of confirmation",
            self.dispatcher.notify(
                &stored.owner,
                Some(&stored.tenant),
                NotificationKind::Appointment,
                &stored.id.0,
                Some(text.clone()),
            ),
        );
        best_effort(
            "post confirmation chat message",
            self.dispatcher.post_chat_message(
                &stored.tenant,
                &stored.owner,
                &stored.property_id,
                text,
            ),
        );

        Ok(stored)
    }

    pub fn decline(&self, actor: &Actor, id: &AppointmentId) -> Result<Appointment, ServiceError> {
        self.close(actor, id, AppointmentAction::Decline)
    }

    pub fn cancel(&self, actor: &Actor, id: &AppointmentId) -> Result<Appointment, ServiceError> {
        self.close(actor, id, AppointmentAction::Cancel)
    }

    /// Route a `{status}` update to decline or cancel.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        status: &str,
    ) -> Result<Appointment, ServiceError> {
        match status.trim().to_ascii_lowercase().as_str() {
            "cancelled" => self.cancel(actor, id),
            "declined" => self.decline(actor, id),
            _ => Err(ServiceError::bad_request("Unsupported status update")),
        }
    }

    /// Appointments where the actor is owner or tenant, newest first.
    pub fn list_for(&self, actor: &Actor) -> Result<Vec<Appointment>, ServiceError> {
        let mut appointments = self.appointments.for_participant(&actor.id)?;
        appointments.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(appointments)
    }

    /// Cancel every active appointment of a removed property.
    pub fn cancel_for_property(&self, property: &Property) -> Result<CascadeOutcome, ServiceError> {
        let mut outcome = CascadeOutcome::default();
        let now = Utc::now();

        for appointment in self.appointments.for_property(&property.id)? {
            let Some(latest) = self.cancel_latest(appointment, now)? else {
                continue;
            };
            outcome.affected_tenants.insert(latest.tenant.clone());
            if latest.status == AppointmentStatus::Cancelled {
                outcome.cancelled.push(latest);
            }
        }

        info!(
            property = %property.id,
            cancelled = outcome.cancelled.len(),
            "appointments cancelled for removed property"
        );
        Ok(outcome)
    }

    fn close(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        action: AppointmentAction,
    ) -> Result<Appointment, ServiceError> {
        let mut appointment = self.load(id)?;
        let participant = appointment.participant(&actor.id).ok_or_else(|| {
            ServiceError::forbidden(format!(
                "Only appointment participants can {} it",
                action.verb()
            ))
        })?;

        let from = appointment.status;
        appointment.close(action, Utc::now()).map_err(transition_error)?;
        let appointment = self
            .appointments
            .commit_transition(appointment, from)
            .map_err(|err| match err {
                RepositoryError::Conflict => ServiceError::bad_request(
                    "Appointment changed concurrently, reload it and try again",
                ),
                other => ServiceError::from(other),
            })?;

        info!(
            appointment = %appointment.id,
            by = participant.label(),
            status = appointment.status.label(),
            "appointment closed"
        );

        let title = self.property_title(&appointment.property_id);
        best_effort(
            "notify counterpart of closure",
            self.dispatcher.notify(
                appointment.counterpart(participant),
                Some(&actor.id),
                NotificationKind::Appointment,
                &appointment.id.0,
                Some(closure_message(participant, action, &title)),
            ),
        );

        Ok(appointment)
    }

    /// Cancel an appointment of a removed property, re-reading it when a concurrent transition
    /// wins the write. Yields `None` if it was already cancelled; a declined record comes back
    /// unchanged.
    fn cancel_latest(
        &self,
        mut appointment: Appointment,
        now: DateTime<Utc>,
    ) -> Result<Option<Appointment>, ServiceError> {
        loop {
            if appointment.status == AppointmentStatus::Cancelled {
                return Ok(None);
            }
            if !appointment.status.is_active() {
                return Ok(Some(appointment));
            }
            let from = appointment.status;
            let mut cancelled = appointment.clone();
            cancelled.cancel(now).map_err(transition_error)?;
            match self.appointments.commit_transition(cancelled, from) {
                Ok(stored) => return Ok(Some(stored)),
                Err(RepositoryError::Conflict) => {
                    appointment = self.load(&appointment.id)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn load(&self, id: &AppointmentId) -> Result<Appointment, ServiceError> {
        self.appointments
            .fetch(id)?
            .ok_or_else(|| ServiceError::not_found("Appointment not found"))
    }

    fn property_title(&self, property_id: &PropertyId) -> String {
        match self.properties.fetch(property_id) {
            Ok(Some(property)) => property.title,
            _ => "the property".to_string(),
        }
    }
}

fn closure_message(participant: Participant, action: AppointmentAction, title: &str) -> String {
    format!(
        "The {} {} the appointment for \"{}\"",
        participant.label(),
        action.past_tense(),
        title
    )
}

fn transition_error(err: TransitionError) -> ServiceError {
    ServiceError::bad_request(err.to_string())
}
