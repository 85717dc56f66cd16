//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! The partial unique index `appointments_active_slot_key` is the final
//! arbiter of slot conflicts; violations surface as `SlotTaken`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{Appointment, AppointmentId, AppointmentStatus, Slot, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, violated_unique_constraint,
};
use super::models::{AppointmentRow, RowError};
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

const ACTIVE_SLOT_CONSTRAINT: &str = "appointments_active_slot_key";

/// Diesel-backed implementation of the appointment repository port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentRepositoryError {
    map_basic_pool_error(error, AppointmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    map_basic_diesel_error(
        error,
        AppointmentRepositoryError::query,
        AppointmentRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, slot: Slot) -> AppointmentRepositoryError {
    match violated_unique_constraint(&error) {
        Some(ACTIVE_SLOT_CONSTRAINT) => AppointmentRepositoryError::slot_taken(slot.to_string()),
        _ => map_diesel_error(error),
    }
}

fn map_row_error(error: RowError) -> AppointmentRepositoryError {
    AppointmentRepositoryError::query(error.to_string())
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(appointments::table)
            .values(AppointmentRow::from(appointment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, appointment.slot()))
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = appointments::table
            .filter(appointments::id.eq(id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first::<AppointmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Appointment::try_from)
            .transpose()
            .map_err(map_row_error)
    }

    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = appointments::table
            .order((appointments::date.asc(), appointments::time.asc()))
            .select(AppointmentRow::as_select())
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(appointments::user_id.eq(*owner.as_uuid()));
        }
        let rows = query
            .load::<AppointmentRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| Appointment::try_from(row).map_err(map_row_error))
            .collect()
    }

    async fn find_conflicting(
        &self,
        slot: &Slot,
        exclude: Option<AppointmentId>,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = appointments::table
            .filter(appointments::date.eq(slot.date))
            .filter(appointments::time.eq(slot.time.as_naive()))
            .filter(appointments::status.ne(AppointmentStatus::Cancelled.as_str()))
            .select(AppointmentRow::as_select())
            .into_boxed();
        if let Some(excluded) = exclude {
            query = query.filter(appointments::id.ne(*excluded.as_uuid()));
        }
        let row = query
            .first::<AppointmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Appointment::try_from)
            .transpose()
            .map_err(map_row_error)
    }

    async fn update(&self, appointment: &Appointment) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = AppointmentRow::from(appointment);

        diesel::update(appointments::table.filter(appointments::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(|err| map_write_error(err, appointment.slot()))
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }
}
