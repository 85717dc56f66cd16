//! Driving port for appointment reads.

use async_trait::async_trait;

use crate::domain::{AppointmentDetails, AppointmentId, Caller, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentQuery: Send + Sync {
    /// Every appointment for admins, otherwise the caller's own.
    async fn list(&self, caller: &Caller) -> Result<Vec<AppointmentDetails>, Error>;

    async fn get(&self, caller: &Caller, id: &AppointmentId)
    -> Result<AppointmentDetails, Error>;
}
