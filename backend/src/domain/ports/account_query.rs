//! Driving port for reading the caller's own account.

use async_trait::async_trait;

use crate::domain::{Caller, Error, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Profile of the authenticated caller, pets included.
    async fn me(&self, caller: &Caller) -> Result<UserProfile, Error>;
}
