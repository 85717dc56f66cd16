//! Driving port for appointment mutations.

use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentId, AppointmentInput, Caller, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Book a slot for the caller. Fails with a conflict when the slot is
    /// held by any non-cancelled appointment.
    async fn create(&self, caller: &Caller, input: AppointmentInput)
    -> Result<Appointment, Error>;

    /// Partial update. The slot is re-checked only when both date and time
    /// are supplied.
    async fn update(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        input: AppointmentInput,
    ) -> Result<Appointment, Error>;

    async fn update_status(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        status: String,
    ) -> Result<Appointment, Error>;

    async fn delete(&self, caller: &Caller, id: &AppointmentId) -> Result<(), Error>;
}
