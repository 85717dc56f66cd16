//! Account services: registration, login, self-service profile and pet
//! management, and bearer token resolution.
//!
//! Sessions are opaque random tokens; only their SHA-256 digest is stored.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, AccountQuery, AccountUpdate, AuthenticatedAccount, Authenticator,
    PasswordHasher, PasswordHasherError, SessionRecord, SessionRepository,
    SessionRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Caller, Email, Error, LoginCredentials, PetChanges, PetDraft, PetId, ProfileChanges,
    Registration, RegistrationInput, SessionToken, User, UserId, UserProfile,
};

/// Lifetime of a freshly issued session.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const TOKEN_FAILED: &str = "Not authorized, token failed";
const EMAIL_TAKEN: &str = "Email already exists";
const USER_NOT_FOUND: &str = "User not found";

pub(super) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(EMAIL_TAKEN),
    }
}

pub(super) fn map_session_error(error: SessionRepositoryError) -> Error {
    match error {
        SessionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("session repository unavailable: {message}"))
        }
        SessionRepositoryError::Query { message } => {
            Error::internal(format!("session repository error: {message}"))
        }
    }
}

pub(super) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(super) fn user_not_found() -> Error {
    Error::not_found(USER_NOT_FOUND)
}

/// Hash the registration password and build the new user record.
pub(super) async fn new_user<H>(
    hasher: &H,
    registration: &Registration,
    now: DateTime<Utc>,
) -> Result<User, Error>
where
    H: PasswordHasher + ?Sized,
{
    let password_hash = hasher
        .hash(registration.password())
        .await
        .map_err(map_hasher_error)?;
    Ok(User {
        id: UserId::random(),
        first_name: registration.first_name().to_owned(),
        last_name: registration.last_name().to_owned(),
        email: registration.email().clone(),
        password_hash,
        phone: registration.phone().to_owned(),
        address: registration.address().to_owned(),
        is_admin: registration.is_admin(),
        pets: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Reject an email already used by a different account.
pub(super) async fn ensure_email_available<U>(
    users: &U,
    email: &Email,
    owner: Option<UserId>,
) -> Result<(), Error>
where
    U: UserRepository + ?Sized,
{
    let existing = users.find_by_email(email).await.map_err(map_user_error)?;
    match existing {
        Some(user) if Some(user.id) != owner => Err(Error::conflict(EMAIL_TAKEN)),
        _ => Ok(()),
    }
}

/// Apply an account update to `user`, re-hashing the password when present.
///
/// Returns whether the password changed, in which case the caller must
/// revoke the user's existing sessions.
pub(super) async fn apply_account_update<U, H>(
    users: &U,
    hasher: &H,
    user: &mut User,
    update: AccountUpdate,
    honour_admin_flag: bool,
    now: DateTime<Utc>,
) -> Result<bool, Error>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    let email = match update.email.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            let email = Email::new(raw)?;
            if email != user.email {
                ensure_email_available(users, &email, Some(user.id)).await?;
            }
            Some(email)
        }
        _ => None,
    };
    let mut password_changed = false;
    if let Some(password) = update.password.as_ref().filter(|p| !p.is_empty()) {
        user.password_hash = hasher.hash(password).await.map_err(map_hasher_error)?;
        password_changed = true;
    }
    if honour_admin_flag {
        if let Some(is_admin) = update.is_admin {
            user.is_admin = is_admin;
        }
    }
    user.apply_profile(
        ProfileChanges {
            first_name: update.first_name,
            last_name: update.last_name,
            email,
            phone: update.phone,
            address: update.address,
        },
        now,
    );
    Ok(password_changed)
}

/// Account service implementing the self-service driving ports.
#[derive(Clone)]
pub struct AccountService<U, S, H> {
    users: Arc<U>,
    sessions: Arc<S>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl<U, S, H> AccountService<U, S, H> {
    /// Create a service issuing sessions valid for
    /// [`DEFAULT_SESSION_TTL_DAYS`].
    pub fn new(users: Arc<U>, sessions: Arc<S>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            sessions,
            hasher,
            clock,
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }

    /// Override the session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

impl<U, S, H> AccountService<U, S, H>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }

    async fn save_user(&self, user: &User) -> Result<(), Error> {
        let found = self.users.update(user).await.map_err(map_user_error)?;
        if found {
            Ok(())
        } else {
            Err(user_not_found())
        }
    }

    async fn open_session(&self, user: &User) -> Result<AuthenticatedAccount, Error> {
        let now = self.clock.utc();
        let purged = self
            .sessions
            .purge_expired(now)
            .await
            .map_err(map_session_error)?;
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }
        let token = SessionToken::generate();
        let record = SessionRecord {
            token_digest: token.digest(),
            user_id: user.id,
            expires_at: now + self.session_ttl,
        };
        self.sessions
            .insert(&record)
            .await
            .map_err(map_session_error)?;
        Ok(AuthenticatedAccount {
            profile: user.profile(),
            token,
        })
    }
}

#[async_trait]
impl<U, S, H> AccountCommand for AccountService<U, S, H>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    async fn register(&self, input: RegistrationInput) -> Result<AuthenticatedAccount, Error> {
        let registration = Registration::try_new(RegistrationInput {
            is_admin: false,
            ..input
        })?;
        ensure_email_available(self.users.as_ref(), registration.email(), None).await?;

        let user = new_user(self.hasher.as_ref(), &registration, self.clock.utc()).await?;
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "account registered");
        self.open_session(&user).await
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedAccount, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        let verified = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.open_session(&user).await
    }

    async fn update_profile(
        &self,
        caller: &Caller,
        update: AccountUpdate,
    ) -> Result<AuthenticatedAccount, Error> {
        let mut user = self.load_user(&caller.user_id()).await?;
        let password_changed = apply_account_update(
            self.users.as_ref(),
            self.hasher.as_ref(),
            &mut user,
            update,
            false,
            self.clock.utc(),
        )
        .await?;
        self.save_user(&user).await?;
        if password_changed {
            self.sessions
                .revoke_for_user(&user.id)
                .await
                .map_err(map_session_error)?;
            info!(user_id = %user.id, "password changed; sessions revoked");
        }
        self.open_session(&user).await
    }

    async fn delete_account(&self, caller: &Caller) -> Result<(), Error> {
        let user_id = caller.user_id();
        let deleted = self.users.delete(&user_id).await.map_err(map_user_error)?;
        if !deleted {
            return Err(user_not_found());
        }
        self.sessions
            .revoke_for_user(&user_id)
            .await
            .map_err(map_session_error)?;
        info!(%user_id, "account deleted");
        Ok(())
    }

    async fn add_pet(&self, caller: &Caller, pet: PetDraft) -> Result<UserProfile, Error> {
        let mut user = self.load_user(&caller.user_id()).await?;
        user.add_pet(pet, self.clock.utc());
        self.save_user(&user).await?;
        Ok(user.profile())
    }

    async fn update_pet(
        &self,
        caller: &Caller,
        pet_id: &PetId,
        changes: PetChanges,
    ) -> Result<UserProfile, Error> {
        let mut user = self.load_user(&caller.user_id()).await?;
        user.update_pet(pet_id, changes, self.clock.utc())?;
        self.save_user(&user).await?;
        Ok(user.profile())
    }

    async fn delete_pet(&self, caller: &Caller, pet_id: &PetId) -> Result<UserProfile, Error> {
        let mut user = self.load_user(&caller.user_id()).await?;
        user.remove_pet(pet_id, self.clock.utc())?;
        self.save_user(&user).await?;
        Ok(user.profile())
    }
}

#[async_trait]
impl<U, S, H> AccountQuery for AccountService<U, S, H>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    async fn me(&self, caller: &Caller) -> Result<UserProfile, Error> {
        Ok(self.load_user(&caller.user_id()).await?.profile())
    }
}

#[async_trait]
impl<U, S, H> Authenticator for AccountService<U, S, H>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, token: &SessionToken) -> Result<Caller, Error> {
        let session = self
            .sessions
            .find(&token.digest())
            .await
            .map_err(map_session_error)?
            .filter(|session| session.expires_at > self.clock.utc())
            .ok_or_else(|| Error::unauthorized(TOKEN_FAILED))?;
        let user = self
            .users
            .find_by_id(&session.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(TOKEN_FAILED))?;
        Ok(Caller::new(user.id, user.is_admin))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
