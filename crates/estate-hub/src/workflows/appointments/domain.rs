use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::workflows::listings::PropertyId;

/// Identifier wrapper for appointments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a scheduling negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Declined,
    Cancelled,
}

/// Something a participant asks the appointment to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Confirm,
    Decline,
    Cancel,
}

impl AppointmentAction {
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Decline => "decline",
            Self::Cancel => "cancel",
        }
    }

    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Confirm => "confirmed",
            Self::Decline => "declined",
            Self::Cancel => "cancelled",
        }
    }
}

/// Every permitted `(from, action) -> to` edge. Anything absent is rejected.
const TRANSITIONS: [(AppointmentStatus, AppointmentAction, AppointmentStatus); 4] = [
    (
        AppointmentStatus::Pending,
        AppointmentAction::Confirm,
        AppointmentStatus::Confirmed,
    ),
    (
        AppointmentStatus::Pending,
        AppointmentAction::Decline,
        AppointmentStatus::Declined,
    ),
    (
        AppointmentStatus::Pending,
        AppointmentAction::Cancel,
        AppointmentStatus::Cancelled,
    ),
    (
        AppointmentStatus::Confirmed,
        AppointmentAction::Cancel,
        AppointmentStatus::Cancelled,
    ),
];

impl AppointmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
        }
    }

    /// Still open to a cancellation cascade.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn next(self, action: AppointmentAction) -> Result<Self, TransitionError> {
        TRANSITIONS
            .iter()
            .find(|(from, candidate, _)| *from == self && *candidate == action)
            .map(|(_, _, to)| *to)
            .ok_or_else(|| match (self, action) {
                (Self::Confirmed, AppointmentAction::Confirm) => TransitionError::AlreadyConfirmed,
                (from, action) => TransitionError::Invalid { from, action },
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Appointment already confirmed")]
    AlreadyConfirmed,
    #[error("Cannot {} an appointment that is {}", .action.verb(), .from.label())]
    Invalid {
        from: AppointmentStatus,
        action: AppointmentAction,
    },
}

/// Which side of the negotiation a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Owner,
    Tenant,
}

impl Participant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Tenant => "tenant",
        }
    }
}

/// Candidate slots, deduplicated by timestamp and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSet(Vec<DateTime<Utc>>);

impl SlotSet {
    /// Unparseable entries are skipped.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        let unique: BTreeSet<DateTime<Utc>> =
            raw.iter().filter_map(|value| parse_slot(value.as_ref())).collect();
        Self(unique.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<DateTime<Utc>> {
        self.0
    }
}

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM[:SS]` (as UTC), and bare dates (midnight UTC).
pub fn parse_slot(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Human-readable slot used in notifications and chat messages.
pub fn format_slot(slot: &DateTime<Utc>) -> String {
    slot.format("%a, %d %b %Y %H:%M UTC").to_string()
}

/// A scheduling negotiation between one owner and one tenant over one property.
///
/// `selected_slot` is set exactly when the status is `confirmed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub property_id: PropertyId,
    pub owner: UserId,
    pub tenant: UserId,
    pub available_slots: Vec<DateTime<Utc>>,
    pub selected_slot: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn propose(
        id: AppointmentId,
        property_id: PropertyId,
        owner: UserId,
        tenant: UserId,
        slots: SlotSet,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            property_id,
            owner,
            tenant,
            available_slots: slots.into_inner(),
            selected_slot: None,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn participant(&self, user: &UserId) -> Option<Participant> {
        if *user == self.owner {
            Some(Participant::Owner)
        } else if *user == self.tenant {
            Some(Participant::Tenant)
        } else {
            None
        }
    }

    pub fn counterpart(&self, participant: Participant) -> &UserId {
        match participant {
            Participant::Owner => &self.tenant,
            Participant::Tenant => &self.owner,
        }
    }

    pub fn offers(&self, slot: &DateTime<Utc>) -> bool {
        self.available_slots.contains(slot)
    }

    /// Confirm the given slot. The caller has already checked it is among the offered ones.
    pub fn confirm(
        &mut self,
        slot: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.status = self.status.next(AppointmentAction::Confirm)?;
        self.selected_slot = Some(slot);
        self.updated_at = now;
        Ok(())
    }

    pub fn decline(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.close(AppointmentAction::Decline, now)
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.close(AppointmentAction::Cancel, now)
    }

    /// Decline or cancel. Confirmation needs a slot and goes through [`Appointment::confirm`].
    pub fn close(
        &mut self,
        action: AppointmentAction,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if action == AppointmentAction::Confirm {
            return Err(TransitionError::Invalid {
                from: self.status,
                action,
            });
        }
        self.status = self.status.next(action)?;
        self.selected_slot = None;
        self.updated_at = now;
        Ok(())
    }
}
