//! Driving port for self-service account mutations.
//!
//! Inbound adapters call this to register, log in, edit their own profile and
//! manage the pets embedded in it.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{
    Caller, Error, LoginCredentials, PetChanges, PetDraft, PetId, RegistrationInput,
    SessionToken, UserProfile,
};

/// Profile returned together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub profile: UserProfile,
    pub token: SessionToken,
}

/// Partial account update. Blank strings leave a field unchanged.
///
/// `is_admin` is only honoured on the administration path.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub is_admin: Option<bool>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a non-admin account and open a session for it.
    async fn register(&self, input: RegistrationInput) -> Result<AuthenticatedAccount, Error>;

    /// Verify credentials and open a session.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedAccount, Error>;

    /// Update the caller's own profile and issue a fresh token. A password
    /// change revokes every earlier token.
    async fn update_profile(
        &self,
        caller: &Caller,
        update: AccountUpdate,
    ) -> Result<AuthenticatedAccount, Error>;

    /// Delete the caller's account and revoke its sessions.
    async fn delete_account(&self, caller: &Caller) -> Result<(), Error>;

    /// Append a pet to the caller's account.
    async fn add_pet(&self, caller: &Caller, pet: PetDraft) -> Result<UserProfile, Error>;

    async fn update_pet(
        &self,
        caller: &Caller,
        pet_id: &PetId,
        changes: PetChanges,
    ) -> Result<UserProfile, Error>;

    async fn delete_pet(&self, caller: &Caller, pet_id: &PetId) -> Result<UserProfile, Error>;
}
