//! PostgreSQL-backed `ServiceBookingRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ServiceBookingRepository, ServiceBookingRepositoryError};
use crate::domain::{BookingId, ServiceBooking, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{RowError, ServiceBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::service_bookings;

#[derive(Clone)]
pub struct DieselServiceBookingRepository {
    pool: DbPool,
}

impl DieselServiceBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ServiceBookingRepositoryError {
    map_basic_pool_error(error, ServiceBookingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ServiceBookingRepositoryError {
    map_basic_diesel_error(
        error,
        ServiceBookingRepositoryError::query,
        ServiceBookingRepositoryError::connection,
    )
}

fn map_row_error(error: RowError) -> ServiceBookingRepositoryError {
    ServiceBookingRepositoryError::query(error.to_string())
}

#[async_trait]
impl ServiceBookingRepository for DieselServiceBookingRepository {
    async fn insert(&self, booking: &ServiceBooking) -> Result<(), ServiceBookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(service_bookings::table)
            .values(ServiceBookingRow::from(booking))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<ServiceBooking>, ServiceBookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = service_bookings::table
            .filter(service_bookings::id.eq(id.as_uuid()))
            .select(ServiceBookingRow::as_select())
            .first::<ServiceBookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(ServiceBooking::try_from)
            .transpose()
            .map_err(map_row_error)
    }

    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<ServiceBooking>, ServiceBookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = service_bookings::table
            .order((service_bookings::date.desc(), service_bookings::time.desc()))
            .select(ServiceBookingRow::as_select())
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(service_bookings::user_id.eq(*owner.as_uuid()));
        }
        let rows = query
            .load::<ServiceBookingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| ServiceBooking::try_from(row).map_err(map_row_error))
            .collect()
    }

    async fn update(&self, booking: &ServiceBooking) -> Result<bool, ServiceBookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ServiceBookingRow::from(booking);

        diesel::update(service_bookings::table.filter(service_bookings::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, ServiceBookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(service_bookings::table.filter(service_bookings::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_diesel_error)
    }
}
