//! Driving port for service booking reads and statistics.

use async_trait::async_trait;

use crate::domain::{BookingDetails, BookingId, BookingStats, Caller, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceBookingQuery: Send + Sync {
    /// The caller's own bookings.
    async fn list_mine(&self, caller: &Caller) -> Result<Vec<BookingDetails>, Error>;

    /// Every booking. Admin only.
    async fn list_all(&self, caller: &Caller) -> Result<Vec<BookingDetails>, Error>;

    async fn get(&self, caller: &Caller, id: &BookingId) -> Result<BookingDetails, Error>;

    /// Aggregate statistics across all bookings. Admin only.
    async fn stats(&self, caller: &Caller) -> Result<BookingStats, Error>;
}
