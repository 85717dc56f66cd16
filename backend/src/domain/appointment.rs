//! Clinic appointments.
//!
//! At most one non-cancelled appointment may hold a given slot. The status
//! set deliberately omits `completed`; see [`AppointmentStatus`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AppointmentId, Error, OwnerSummary, Slot, SlotTime, UserId, parse_slot_date};

/// Clinic service offered for an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AppointmentService {
    Checkup,
    Vaccination,
    Grooming,
}

impl AppointmentService {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkup => "Checkup",
            Self::Vaccination => "Vaccination",
            Self::Grooming => "Grooming",
        }
    }
}

impl fmt::Display for AppointmentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown appointment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid service")]
pub struct ParseAppointmentServiceError;

impl FromStr for AppointmentService {
    type Err = ParseAppointmentServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Checkup" => Ok(Self::Checkup),
            "Vaccination" => Ok(Self::Vaccination),
            "Grooming" => Ok(Self::Grooming),
            _ => Err(ParseAppointmentServiceError),
        }
    }
}

/// Appointment lifecycle state.
///
/// Any value may be set regardless of the current one; the UI drives the
/// pending → confirmed → cancelled flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the appointment still occupies its slot.
    pub const fn holds_slot(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an appointment status outside the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status")]
pub struct ParseAppointmentStatusError;

impl FromStr for AppointmentStatus {
    type Err = ParseAppointmentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseAppointmentStatusError),
        }
    }
}

/// Parse a client-supplied appointment status.
pub fn parse_appointment_status(raw: &str) -> Result<AppointmentStatus, Error> {
    raw.parse()
        .map_err(|err: ParseAppointmentStatusError| Error::invalid_request(err.to_string()))
}

/// A persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    /// Pet reference as supplied by the client.
    pub pet: String,
    pub service: AppointmentService,
    #[schema(value_type = String, format = Date, example = "2025-06-01")]
    pub date: NaiveDate,
    pub time: SlotTime,
    pub notes: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }

    /// Whether this appointment blocks `slot` for everyone else.
    pub fn occupies(&self, slot: &Slot) -> bool {
        self.status.holds_slot() && &self.slot() == slot
    }
}

/// Raw appointment fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentInput {
    pub pet: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_service(raw: &str) -> Result<AppointmentService, Error> {
    raw.parse()
        .map_err(|err: ParseAppointmentServiceError| Error::invalid_request(err.to_string()))
}

/// Validated input for a new appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub pet: String,
    pub service: AppointmentService,
    pub slot: Slot,
    pub notes: String,
}

impl AppointmentDraft {
    /// Validate creation input: pet, service, date and time are required.
    pub fn try_from_input(input: &AppointmentInput) -> Result<Self, Error> {
        let (Some(pet), Some(service), Some(date), Some(time)) = (
            present(input.pet.as_ref()),
            present(input.service.as_ref()),
            present(input.date.as_ref()),
            present(input.time.as_ref()),
        ) else {
            return Err(Error::invalid_request("All fields are required"));
        };
        Ok(Self {
            pet: pet.to_owned(),
            service: parse_service(service)?,
            slot: Slot::new(parse_slot_date(date)?, SlotTime::parse(time)?),
            notes: input.notes.clone().unwrap_or_default(),
        })
    }
}

/// Validated partial update. Absent or blank fields are left untouched,
/// except `notes`, which is overwritten whenever present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentChanges {
    pub pet: Option<String>,
    pub service: Option<AppointmentService>,
    pub date: Option<NaiveDate>,
    pub time: Option<SlotTime>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentChanges {
    pub fn try_from_input(input: &AppointmentInput) -> Result<Self, Error> {
        Ok(Self {
            pet: present(input.pet.as_ref()).map(str::to_owned),
            service: present(input.service.as_ref())
                .map(parse_service)
                .transpose()?,
            date: present(input.date.as_ref())
                .map(parse_slot_date)
                .transpose()?,
            time: present(input.time.as_ref())
                .map(SlotTime::parse)
                .transpose()?,
            notes: input.notes.clone(),
            status: present(input.status.as_ref())
                .map(parse_appointment_status)
                .transpose()?,
        })
    }

    /// Slot to re-check for conflicts; only when both parts are supplied.
    pub fn requested_slot(&self) -> Option<Slot> {
        self.date.zip(self.time).map(|(date, time)| Slot::new(date, time))
    }

    /// Apply the changes to an appointment.
    pub fn apply(self, appointment: &mut Appointment, now: DateTime<Utc>) {
        if let Some(pet) = self.pet {
            appointment.pet = pet;
        }
        if let Some(service) = self.service {
            appointment.service = service;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(notes) = self.notes {
            appointment.notes = notes;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        appointment.updated_at = now;
    }
}

/// Appointment joined with its owner's contact details and pets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    /// Absent when the owner account no longer exists.
    pub user: Option<OwnerSummary>,
}
