//! In-memory `AppointmentRepository`.
//!
//! Slot uniqueness is enforced inside the lock on both insert and update, so
//! concurrent bookings for the same slot cannot both succeed.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{Appointment, AppointmentId, Slot, UserId};

#[derive(Debug, Default)]
pub struct MemoryAppointmentRepository {
    appointments: Mutex<Vec<Appointment>>,
}

impl MemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn holder<'a>(
    appointments: &'a [Appointment],
    slot: &Slot,
    exclude: Option<AppointmentId>,
) -> Option<&'a Appointment> {
    appointments
        .iter()
        .filter(|appointment| Some(appointment.id) != exclude)
        .find(|appointment| appointment.occupies(slot))
}

fn ensure_free(
    appointments: &[Appointment],
    candidate: &Appointment,
) -> Result<(), AppointmentRepositoryError> {
    if !candidate.status.holds_slot() {
        return Ok(());
    }
    let slot = candidate.slot();
    match holder(appointments, &slot, Some(candidate.id)) {
        Some(_) => Err(AppointmentRepositoryError::slot_taken(slot.to_string())),
        None => Ok(()),
    }
}

#[async_trait]
impl AppointmentRepository for MemoryAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut appointments = self.appointments.lock().await;
        ensure_free(&appointments, appointment)?;
        appointments.push(appointment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let appointments = self.appointments.lock().await;
        Ok(appointments.iter().find(|a| &a.id == id).cloned())
    }

    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let appointments = self.appointments.lock().await;
        let mut listed: Vec<Appointment> = appointments
            .iter()
            .filter(|a| owner.is_none_or(|owner| a.user_id == owner))
            .cloned()
            .collect();
        listed.sort_by_key(Appointment::slot);
        Ok(listed)
    }

    async fn find_conflicting(
        &self,
        slot: &Slot,
        exclude: Option<AppointmentId>,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let appointments = self.appointments.lock().await;
        Ok(holder(&appointments, slot, exclude).cloned())
    }

    async fn update(&self, appointment: &Appointment) -> Result<bool, AppointmentRepositoryError> {
        let mut appointments = self.appointments.lock().await;
        let Some(index) = appointments.iter().position(|a| a.id == appointment.id) else {
            return Ok(false);
        };
        ensure_free(&appointments, appointment)?;
        appointments[index] = appointment.clone();
        Ok(true)
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        let mut appointments = self.appointments.lock().await;
        let before = appointments.len();
        appointments.retain(|a| &a.id != id);
        Ok(appointments.len() != before)
    }
}
