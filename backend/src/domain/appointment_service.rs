//! Appointment booking service.
//!
//! The slot check runs before every write that could take a slot, and the
//! repository enforces it again atomically, so a lost race surfaces as the
//! same conflict error.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::account_service::map_user_error;
use crate::domain::ports::{
    AppointmentCommand, AppointmentQuery, AppointmentRepository, AppointmentRepositoryError,
    UserRepository,
};
use crate::domain::{
    Appointment, AppointmentChanges, AppointmentDetails, AppointmentDraft, AppointmentId,
    AppointmentInput, AppointmentStatus, Caller, Error, OwnerSummary, Slot, UserId,
    parse_appointment_status,
};

const SLOT_TAKEN: &str = "This time slot is already booked";
const NOT_FOUND: &str = "Appointment not found";
const NOT_OWNER: &str = "Not authorized to access this appointment";

fn map_repository_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentRepositoryError::SlotTaken { .. } => Error::conflict(SLOT_TAKEN),
    }
}

/// Status changes are admin only, except an owner cancelling their own.
fn authorise_status_change(caller: &Caller, status: AppointmentStatus) -> Result<(), Error> {
    if caller.is_admin() || status == AppointmentStatus::Cancelled {
        Ok(())
    } else {
        caller.require_admin()
    }
}

/// Service implementing the appointment driving ports.
#[derive(Clone)]
pub struct AppointmentBookingService<A, U> {
    appointments: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> AppointmentBookingService<A, U> {
    pub fn new(appointments: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            appointments,
            users,
            clock,
        }
    }
}

impl<A, U> AppointmentBookingService<A, U>
where
    A: AppointmentRepository,
    U: UserRepository,
{
    async fn load_accessible(
        &self,
        caller: &Caller,
        id: &AppointmentId,
    ) -> Result<Appointment, Error> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        if !caller.can_access(&appointment.user_id) {
            return Err(Error::forbidden(NOT_OWNER));
        }
        Ok(appointment)
    }

    async fn ensure_slot_free(
        &self,
        slot: &Slot,
        exclude: Option<AppointmentId>,
    ) -> Result<(), Error> {
        let conflict = self
            .appointments
            .find_conflicting(slot, exclude)
            .await
            .map_err(map_repository_error)?;
        match conflict {
            Some(_) => Err(Error::conflict(SLOT_TAKEN).with_details(serde_json::json!({
                "slot": slot.to_string(),
            }))),
            None => Ok(()),
        }
    }

    async fn save(&self, appointment: &Appointment) -> Result<(), Error> {
        let found = self
            .appointments
            .update(appointment)
            .await
            .map_err(map_repository_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }

    async fn owners(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, OwnerSummary>, Error> {
        let users = self
            .users
            .find_many(user_ids)
            .await
            .map_err(map_user_error)?;
        Ok(users
            .iter()
            .map(|user| (user.id, user.owner_summary()))
            .collect())
    }

    async fn join(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentDetails>, Error> {
        let user_ids: Vec<UserId> = appointments
            .iter()
            .map(|a| a.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owners = self.owners(&user_ids).await?;
        Ok(appointments
            .into_iter()
            .map(|appointment| AppointmentDetails {
                user: owners.get(&appointment.user_id).cloned(),
                appointment,
            })
            .collect())
    }
}

#[async_trait]
impl<A, U> AppointmentCommand for AppointmentBookingService<A, U>
where
    A: AppointmentRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        caller: &Caller,
        input: AppointmentInput,
    ) -> Result<Appointment, Error> {
        let draft = AppointmentDraft::try_from_input(&input)?;
        self.ensure_slot_free(&draft.slot, None).await?;

        let now = self.clock.utc();
        let appointment = Appointment {
            id: AppointmentId::random(),
            user_id: caller.user_id(),
            pet: draft.pet,
            service: draft.service,
            date: draft.slot.date,
            time: draft.slot.time,
            notes: draft.notes,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.appointments
            .insert(&appointment)
            .await
            .map_err(map_repository_error)?;
        info!(appointment_id = %appointment.id, slot = %draft.slot, "appointment booked");
        Ok(appointment)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        input: AppointmentInput,
    ) -> Result<Appointment, Error> {
        let mut appointment = self.load_accessible(caller, id).await?;
        let changes = AppointmentChanges::try_from_input(&input)?;
        if let Some(status) = changes.status {
            authorise_status_change(caller, status)?;
        }
        if let Some(slot) = changes.requested_slot() {
            self.ensure_slot_free(&slot, Some(appointment.id)).await?;
        }
        changes.apply(&mut appointment, self.clock.utc());
        self.save(&appointment).await?;
        Ok(appointment)
    }

    async fn update_status(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        status: String,
    ) -> Result<Appointment, Error> {
        let mut appointment = self.load_accessible(caller, id).await?;
        let status = parse_appointment_status(&status)?;
        authorise_status_change(caller, status)?;
        appointment.status = status;
        appointment.updated_at = self.clock.utc();
        self.save(&appointment).await?;
        info!(appointment_id = %appointment.id, %status, "appointment status changed");
        Ok(appointment)
    }

    async fn delete(&self, caller: &Caller, id: &AppointmentId) -> Result<(), Error> {
        let appointment = self.load_accessible(caller, id).await?;
        let deleted = self
            .appointments
            .delete(&appointment.id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[async_trait]
impl<A, U> AppointmentQuery for AppointmentBookingService<A, U>
where
    A: AppointmentRepository,
    U: UserRepository,
{
    async fn list(&self, caller: &Caller) -> Result<Vec<AppointmentDetails>, Error> {
        let owner = (!caller.is_admin()).then(|| caller.user_id());
        let appointments = self
            .appointments
            .list(owner)
            .await
            .map_err(map_repository_error)?;
        self.join(appointments).await
    }

    async fn get(
        &self,
        caller: &Caller,
        id: &AppointmentId,
    ) -> Result<AppointmentDetails, Error> {
        let appointment = self.load_accessible(caller, id).await?;
        let mut joined = self.join(vec![appointment]).await?;
        joined
            .pop()
            .ok_or_else(|| Error::internal("appointment join returned no rows"))
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;
