//! Service booking workflows and statistics.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::account_service::map_user_error;
use crate::domain::ports::{
    ServiceBookingCommand, ServiceBookingQuery, ServiceBookingRepository,
    ServiceBookingRepositoryError, UserRepository,
};
use crate::domain::{
    BookingChanges, BookingDetails, BookingDraft, BookingId, BookingInput, BookingStats,
    BookingStatus, Caller, Error, OwnerSummary, ServiceBooking, UserId, parse_booking_status,
};

const NOT_FOUND: &str = "Booking not found";
const NOT_OWNER: &str = "Not authorized to access this booking";
const PET_NOT_FOUND: &str = "Pet not found";

fn map_repository_error(error: ServiceBookingRepositoryError) -> Error {
    match error {
        ServiceBookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        ServiceBookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
    }
}

fn authorise_status_change(caller: &Caller, status: BookingStatus) -> Result<(), Error> {
    if caller.is_admin() || status == BookingStatus::Cancelled {
        Ok(())
    } else {
        caller.require_admin()
    }
}

/// Service implementing the booking driving ports.
#[derive(Clone)]
pub struct ServiceBookingService<B, U> {
    bookings: Arc<B>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<B, U> ServiceBookingService<B, U> {
    pub fn new(bookings: Arc<B>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings,
            users,
            clock,
        }
    }
}

impl<B, U> ServiceBookingService<B, U>
where
    B: ServiceBookingRepository,
    U: UserRepository,
{
    async fn load_accessible(&self, caller: &Caller, id: &BookingId) -> Result<ServiceBooking, Error> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        if !caller.can_access(&booking.user_id) {
            return Err(Error::forbidden(NOT_OWNER));
        }
        Ok(booking)
    }

    /// The pet reference must name one of `owner`'s pets. Returns the pet id
    /// in canonical form, which is what bookings store.
    async fn ensure_pet_owned(&self, owner: &UserId, pet: &str) -> Result<String, Error> {
        let user = self
            .users
            .find_by_id(owner)
            .await
            .map_err(map_user_error)?;
        user.as_ref()
            .and_then(|user| user.pet_by_reference(pet))
            .map(|pet| pet.id.to_string())
            .ok_or_else(|| Error::invalid_request(PET_NOT_FOUND))
    }

    async fn save(&self, booking: &ServiceBooking) -> Result<(), Error> {
        let found = self
            .bookings
            .update(booking)
            .await
            .map_err(map_repository_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }

    async fn join(&self, bookings: Vec<ServiceBooking>) -> Result<Vec<BookingDetails>, Error> {
        let user_ids: Vec<UserId> = bookings
            .iter()
            .map(|b| b.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owners: HashMap<UserId, OwnerSummary> = self
            .users
            .find_many(&user_ids)
            .await
            .map_err(map_user_error)?
            .iter()
            .map(|user| (user.id, user.owner_summary()))
            .collect();
        Ok(bookings
            .into_iter()
            .map(|booking| {
                let owner = owners.get(&booking.user_id).cloned();
                BookingDetails::join(booking, owner)
            })
            .collect())
    }

    async fn list_for(&self, owner: Option<UserId>) -> Result<Vec<BookingDetails>, Error> {
        let bookings = self
            .bookings
            .list(owner)
            .await
            .map_err(map_repository_error)?;
        self.join(bookings).await
    }
}

#[async_trait]
impl<B, U> ServiceBookingCommand for ServiceBookingService<B, U>
where
    B: ServiceBookingRepository,
    U: UserRepository,
{
    async fn create(&self, caller: &Caller, input: BookingInput) -> Result<ServiceBooking, Error> {
        let draft = BookingDraft::try_from_input(&input)?;
        let pet = self.ensure_pet_owned(&caller.user_id(), &draft.pet).await?;

        let now = self.clock.utc();
        let booking = ServiceBooking {
            id: BookingId::random(),
            user_id: caller.user_id(),
            pet,
            service_type: draft.service_type,
            date: draft.date,
            time: draft.time,
            address: draft.address,
            notes: draft.notes,
            status: BookingStatus::Pending,
            price: draft.price,
            created_at: now,
            updated_at: now,
        };
        self.bookings
            .insert(&booking)
            .await
            .map_err(map_repository_error)?;
        info!(booking_id = %booking.id, service_type = %booking.service_type, "service booked");
        Ok(booking)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &BookingId,
        input: BookingInput,
    ) -> Result<ServiceBooking, Error> {
        let mut booking = self.load_accessible(caller, id).await?;
        let mut changes = BookingChanges::try_from_input(&input)?;
        if let Some(status) = changes.status {
            authorise_status_change(caller, status)?;
        }
        if let Some(pet) = changes.pet.take() {
            changes.pet = Some(self.ensure_pet_owned(&booking.user_id, &pet).await?);
        }
        changes.apply(&mut booking, self.clock.utc());
        self.save(&booking).await?;
        Ok(booking)
    }

    async fn update_status(
        &self,
        caller: &Caller,
        id: &BookingId,
        status: String,
    ) -> Result<ServiceBooking, Error> {
        let mut booking = self.load_accessible(caller, id).await?;
        let status = parse_booking_status(&status)?;
        authorise_status_change(caller, status)?;
        booking.status = status;
        booking.updated_at = self.clock.utc();
        self.save(&booking).await?;
        info!(booking_id = %booking.id, %status, "booking status changed");
        Ok(booking)
    }

    async fn delete(&self, caller: &Caller, id: &BookingId) -> Result<(), Error> {
        let booking = self.load_accessible(caller, id).await?;
        let deleted = self
            .bookings
            .delete(&booking.id)
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
impl<B, U> ServiceBookingQuery for ServiceBookingService<B, U>
where
    B: ServiceBookingRepository,
    U: UserRepository,
{
    async fn list_mine(&self, caller: &Caller) -> Result<Vec<BookingDetails>, Error> {
        self.list_for(Some(caller.user_id())).await
    }

    async fn list_all(&self, caller: &Caller) -> Result<Vec<BookingDetails>, Error> {
        caller.require_admin()?;
        self.list_for(None).await
    }

    async fn get(&self, caller: &Caller, id: &BookingId) -> Result<BookingDetails, Error> {
        let booking = self.load_accessible(caller, id).await?;
        let mut joined = self.join(vec![booking]).await?;
        joined
            .pop()
            .ok_or_else(|| Error::internal("booking join returned no rows"))
    }

    async fn stats(&self, caller: &Caller) -> Result<BookingStats, Error> {
        caller.require_admin()?;
        let bookings = self
            .bookings
            .list(None)
            .await
            .map_err(map_repository_error)?;
        BookingStats::from_bookings(&bookings)
    }
}

#[cfg(test)]
#[path = "service_booking_service_tests.rs"]
mod tests;
