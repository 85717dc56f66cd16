//! In-memory `ServiceBookingRepository`.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{ServiceBookingRepository, ServiceBookingRepositoryError};
use crate::domain::{BookingId, ServiceBooking, UserId};

#[derive(Debug, Default)]
pub struct MemoryServiceBookingRepository {
    bookings: Mutex<Vec<ServiceBooking>>,
}

impl MemoryServiceBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceBookingRepository for MemoryServiceBookingRepository {
    async fn insert(&self, booking: &ServiceBooking) -> Result<(), ServiceBookingRepositoryError> {
        self.bookings.lock().await.push(booking.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<ServiceBooking>, ServiceBookingRepositoryError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings.iter().find(|b| &b.id == id).cloned())
    }

    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<ServiceBooking>, ServiceBookingRepositoryError> {
        let bookings = self.bookings.lock().await;
        let mut listed: Vec<ServiceBooking> = bookings
            .iter()
            .filter(|b| owner.is_none_or(|owner| b.user_id == owner))
            .cloned()
            .collect();
        listed.sort_by_key(|b| Reverse(b.date));
        Ok(listed)
    }

    async fn update(&self, booking: &ServiceBooking) -> Result<bool, ServiceBookingRepositoryError> {
        let mut bookings = self.bookings.lock().await;
        let Some(stored) = bookings.iter_mut().find(|b| b.id == booking.id) else {
            return Ok(false);
        };
        *stored = booking.clone();
        Ok(true)
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, ServiceBookingRepositoryError> {
        let mut bookings = self.bookings.lock().await;
        let before = bookings.len();
        bookings.retain(|b| &b.id != id);
        Ok(bookings.len() != before)
    }
}
