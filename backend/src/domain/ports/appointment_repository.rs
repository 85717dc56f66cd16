//! Port for appointment persistence.
//!
//! Adapters must reject a write that would leave two non-cancelled
//! appointments on the same slot, atomically with the write itself.

use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentId, Slot, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
        /// Another active appointment already holds the slot.
        SlotTaken { slot: String } => "slot already booked: {slot}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Appointments ordered by date then time, optionally for one owner.
    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// First non-cancelled appointment on `slot`, ignoring `exclude`.
    async fn find_conflicting(
        &self,
        slot: &Slot,
        exclude: Option<AppointmentId>,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// Replace a stored appointment. Returns `false` when it does not exist.
    async fn update(&self, appointment: &Appointment) -> Result<bool, AppointmentRepositoryError>;

    /// Returns `false` when the appointment does not exist.
    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError>;
}
