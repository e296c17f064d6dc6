//! Appointment negotiation between a listing's owner and a prospective tenant.
//!
//! Owners propose candidate slots, tenants confirm one of them, and either side may decline or
//! cancel. Transitions are validated by [`AppointmentStatus::next`]; the double-booking guard lives
//! in [`AppointmentRepository::commit_confirmation`].

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    format_slot, parse_slot, Appointment, AppointmentAction, AppointmentId, AppointmentStatus,
    Participant, SlotSet, TransitionError,
};
pub use repository::AppointmentRepository;
pub use router::appointment_router;
pub use service::{AppointmentService, CascadeOutcome, ProposeRequest};
