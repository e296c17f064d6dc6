use crate::error::RepositoryError;
use crate::identity::UserId;
use crate::workflows::listings::PropertyId;

use super::domain::{Appointment, AppointmentId, AppointmentStatus};

/// Appointment storage.
pub trait AppointmentRepository: Send + Sync {
    fn insert(&self, appointment: Appointment) -> Result<Appointment, RepositoryError>;
    fn fetch(&self, id: &AppointmentId) -> Result<Option<Appointment>, RepositoryError>;
    fn for_property(&self, property_id: &PropertyId) -> Result<Vec<Appointment>, RepositoryError>;
    fn for_participant(&self, user: &UserId) -> Result<Vec<Appointment>, RepositoryError>;

    /// Atomically persist a confirmed appointment.
    ///
    /// Within one critical section (or transaction) implementations must verify that the stored
    /// record is still `pending`, failing with [`RepositoryError::Conflict`] otherwise, and that no
    /// other appointment for the same property is `confirmed` at the identical slot, failing with
    /// [`RepositoryError::SlotTaken`].
    fn commit_confirmation(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, RepositoryError>;

    /// Persist a status change only if the stored record is still in `expected_from`.
    ///
    /// A record that moved on in the meantime fails with [`RepositoryError::Conflict`] and is left
    /// untouched.
    fn commit_transition(
        &self,
        appointment: Appointment,
        expected_from: AppointmentStatus,
    ) -> Result<Appointment, RepositoryError>;
}
