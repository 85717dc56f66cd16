//! Admin-only account management.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use super::account_service::{
    apply_account_update, ensure_email_available, map_session_error, map_user_error, new_user,
    user_not_found,
};
use crate::domain::ports::{
    AccountUpdate, PasswordHasher, SessionRepository, UserAdministration, UserRepository,
};
use crate::domain::{
    Caller, Email, Error, Registration, RegistrationInput, UserId, UserProfile,
};

/// Service implementing [`UserAdministration`].
#[derive(Clone)]
pub struct UserAdminService<U, S, H> {
    users: Arc<U>,
    sessions: Arc<S>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, S, H> UserAdminService<U, S, H> {
    pub fn new(users: Arc<U>, sessions: Arc<S>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            sessions,
            hasher,
            clock,
        }
    }
}

impl<U, S, H> UserAdminService<U, S, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    /// Make sure an administrator with `email` exists.
    ///
    /// An existing account is promoted and keeps its password; otherwise a
    /// new admin account is created with `password`.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: Zeroizing<String>,
    ) -> Result<UserProfile, Error> {
        let address = Email::new(email)?;
        let existing = self
            .users
            .find_by_email(&address)
            .await
            .map_err(map_user_error)?;
        if let Some(mut user) = existing {
            if !user.is_admin {
                user.is_admin = true;
                user.updated_at = self.clock.utc();
                self.users.update(&user).await.map_err(map_user_error)?;
                info!(user_id = %user.id, "existing account promoted to admin");
            }
            return Ok(user.profile());
        }

        let registration = Registration::try_new(RegistrationInput {
            first_name: "Admin".to_owned(),
            last_name: "User".to_owned(),
            email: email.to_owned(),
            password,
            is_admin: true,
            ..RegistrationInput::default()
        })?;
        let user = new_user(self.hasher.as_ref(), &registration, self.clock.utc()).await?;
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "bootstrap admin created");
        Ok(user.profile())
    }
}

#[async_trait]
impl<U, S, H> UserAdministration for UserAdminService<U, S, H>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, caller: &Caller) -> Result<Vec<UserProfile>, Error> {
        caller.require_admin()?;
        let users = self.users.list().await.map_err(map_user_error)?;
        Ok(users.iter().map(|user| user.profile()).collect())
    }

    async fn get_user(&self, caller: &Caller, id: &UserId) -> Result<UserProfile, Error> {
        caller.require_admin()?;
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.profile())
            .ok_or_else(user_not_found)
    }

    async fn create_user(
        &self,
        caller: &Caller,
        input: RegistrationInput,
    ) -> Result<UserProfile, Error> {
        caller.require_admin()?;
        let registration = Registration::try_new(input)?;
        ensure_email_available(self.users.as_ref(), registration.email(), None).await?;
        let user = new_user(self.hasher.as_ref(), &registration, self.clock.utc()).await?;
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, admin = user.is_admin, "account created by admin");
        Ok(user.profile())
    }

    async fn update_user(
        &self,
        caller: &Caller,
        id: &UserId,
        update: AccountUpdate,
    ) -> Result<UserProfile, Error> {
        caller.require_admin()?;
        let mut user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)?;
        let password_changed = apply_account_update(
            self.users.as_ref(),
            self.hasher.as_ref(),
            &mut user,
            update,
            true,
            self.clock.utc(),
        )
        .await?;
        if !self.users.update(&user).await.map_err(map_user_error)? {
            return Err(user_not_found());
        }
        if password_changed {
            self.sessions
                .revoke_for_user(id)
                .await
                .map_err(map_session_error)?;
            info!(user_id = %id, "password reset by admin; sessions revoked");
        }
        Ok(user.profile())
    }

    async fn delete_user(&self, caller: &Caller, id: &UserId) -> Result<(), Error> {
        caller.require_admin()?;
        if !self.users.delete(id).await.map_err(map_user_error)? {
            return Err(user_not_found());
        }
        self.sessions
            .revoke_for_user(id)
            .await
            .map_err(map_session_error)?;
        info!(user_id = %id, "account deleted by admin");
        Ok(())
    }
}
