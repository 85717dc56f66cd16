//! Driving port for service booking mutations.

use async_trait::async_trait;

use crate::domain::{BookingId, BookingInput, Caller, Error, ServiceBooking};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceBookingCommand: Send + Sync {
    /// Book a service for one of the caller's own pets.
    async fn create(&self, caller: &Caller, input: BookingInput)
    -> Result<ServiceBooking, Error>;

    async fn update(
        &self,
        caller: &Caller,
        id: &BookingId,
        input: BookingInput,
    ) -> Result<ServiceBooking, Error>;

    async fn update_status(
        &self,
        caller: &Caller,
        id: &BookingId,
        status: String,
    ) -> Result<ServiceBooking, Error>;

    async fn delete(&self, caller: &Caller, id: &BookingId) -> Result<(), Error>;
}
