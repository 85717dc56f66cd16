//! Authentication primitives: credentials, registrations, bearer tokens and
//! the resolved caller identity.
//!
//! Inbound adapters build these from raw strings; services only ever see the
//! validated forms.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{Email, Error, UserId, UserValidationError};

const TOKEN_BYTES: usize = 32;

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty. It is not format-checked so that a
///   malformed address fails like any unknown account.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use pawcare::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" jane@example.com ", "hunter2")
///     .expect("valid credentials");
/// assert_eq!(creds.email(), "jane@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(UserValidationError::MissingRequiredFields);
        }
        Ok(Self {
            email: email.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Lower-cased email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_admin: bool,
}

/// Validated registration for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    first_name: String,
    last_name: String,
    email: Email,
    password: Zeroizing<String>,
    phone: String,
    address: String,
    is_admin: bool,
}

impl Registration {
    /// Validate registration input.
    ///
    /// First name, last name, email and password are required; phone and
    /// address default to empty strings.
    pub fn try_new(input: RegistrationInput) -> Result<Self, UserValidationError> {
        let RegistrationInput {
            first_name,
            last_name,
            email,
            password,
            phone,
            address,
            is_admin,
        } = input;
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty()
            || last_name.is_empty()
            || email.trim().is_empty()
            || password.is_empty()
        {
            return Err(UserValidationError::MissingRequiredFields);
        }
        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: Email::new(email)?,
            password,
            phone: phone.unwrap_or_default(),
            address: address.unwrap_or_default(),
            is_admin,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the account is created with admin rights.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Opaque bearer token handed to clients.
///
/// Only [`SessionToken::digest`] is ever persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Wrap a token presented by a client.
    pub fn from_presented(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Token text returned to the client.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hex-encoded SHA-256 digest used as the storage key.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Storage key derived from a [`SessionToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest loaded from storage.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Authenticated identity resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    is_admin: bool,
}

impl Caller {
    pub const fn new(user_id: UserId, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Fail unless the caller holds the admin flag.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::forbidden("Admin access required"))
        }
    }

    /// Whether the caller owns a record or is an admin.
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin || &self.user_id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input() -> RegistrationInput {
        RegistrationInput {
            first_name: "Jane".to_owned(),
            last_name: "Doe".to_owned(),
            email: "Jane@Example.com".to_owned(),
            password: Zeroizing::new("hunter2".to_owned()),
            ..RegistrationInput::default()
        }
    }

    #[rstest]
    fn registration_defaults_optional_fields() {
        let registration = Registration::try_new(input()).expect("valid registration");
        assert_eq!(registration.email().as_ref(), "jane@example.com");
        assert_eq!(registration.phone(), "");
        assert_eq!(registration.address(), "");
        assert!(!registration.is_admin());
    }

    #[rstest]
    #[case::first_name(|i: &mut RegistrationInput| i.first_name.clear())]
    #[case::last_name(|i: &mut RegistrationInput| i.last_name = "  ".to_owned())]
    #[case::email(|i: &mut RegistrationInput| i.email.clear())]
    #[case::password(|i: &mut RegistrationInput| i.password = Zeroizing::new(String::new()))]
    fn registration_requires_core_fields(#[case] blank: fn(&mut RegistrationInput)) {
        let mut raw = input();
        blank(&mut raw);
        assert_eq!(
            Registration::try_new(raw),
            Err(UserValidationError::MissingRequiredFields)
        );
    }

    #[rstest]
    fn registration_rejects_malformed_email() {
        let mut raw = input();
        raw.email = "jane-at-example".to_owned();
        assert_eq!(
            Registration::try_new(raw),
            Err(UserValidationError::InvalidEmail)
        );
    }

    #[rstest]
    fn generated_tokens_are_unique_hex() {
        let first = SessionToken::generate();
        let second = SessionToken::generate();
        assert_ne!(first, second);
        assert_eq!(first.expose().len(), TOKEN_BYTES * 2);
        assert!(first.expose().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn digest_is_stable_for_presented_token() {
        let issued = SessionToken::generate();
        let presented = SessionToken::from_presented(issued.expose().to_owned());
        assert_eq!(issued.digest(), presented.digest());
        assert_ne!(issued.digest().as_str(), issued.expose());
    }

    #[rstest]
    fn caller_access_rules() {
        let owner = UserId::random();
        let stranger = Caller::new(UserId::random(), false);
        assert!(Caller::new(owner, false).can_access(&owner));
        assert!(!stranger.can_access(&owner));
        assert!(Caller::new(UserId::random(), true).can_access(&owner));
        assert!(stranger.require_admin().is_err());
    }
}
