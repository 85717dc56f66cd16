//! Port for service booking persistence.

use async_trait::async_trait;

use crate::domain::{BookingId, ServiceBooking, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by service booking repository adapters.
    pub enum ServiceBookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceBookingRepository: Send + Sync {
    async fn insert(&self, booking: &ServiceBooking) -> Result<(), ServiceBookingRepositoryError>;

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<ServiceBooking>, ServiceBookingRepositoryError>;

    /// Bookings newest date first, optionally for one owner.
    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<ServiceBooking>, ServiceBookingRepositoryError>;

    /// Returns `false` when the booking does not exist.
    async fn update(&self, booking: &ServiceBooking) -> Result<bool, ServiceBookingRepositoryError>;

    /// Returns `false` when the booking does not exist.
    async fn delete(&self, id: &BookingId) -> Result<bool, ServiceBookingRepositoryError>;
}
