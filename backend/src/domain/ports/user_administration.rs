//! Driving port for admin-only account management.

use async_trait::async_trait;

use crate::domain::{Caller, Error, RegistrationInput, UserId, UserProfile};

use super::AccountUpdate;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    async fn list_users(&self, caller: &Caller) -> Result<Vec<UserProfile>, Error>;

    async fn get_user(&self, caller: &Caller, id: &UserId) -> Result<UserProfile, Error>;

    /// Create an account; unlike registration the admin flag may be set.
    async fn create_user(
        &self,
        caller: &Caller,
        input: RegistrationInput,
    ) -> Result<UserProfile, Error>;

    async fn update_user(
        &self,
        caller: &Caller,
        id: &UserId,
        update: AccountUpdate,
    ) -> Result<UserProfile, Error>;

    async fn delete_user(&self, caller: &Caller, id: &UserId) -> Result<(), Error>;
}
