//! User accounts and the pets embedded in them.
//!
//! Pets are owned by their user and only change through a rewrite of the
//! parent record. Pet order is insertion order and survives every write.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Error, PetId, UserId};

/// Validation errors raised by user and pet constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    MissingRequiredFields,
    PetNameAndTypeRequired,
    PetNotFound,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "Email is required"),
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::MissingRequiredFields => write!(f, "Please provide all required fields"),
            Self::PetNameAndTypeRequired => write!(f, "Pet name and type are required"),
            Self::PetNotFound => write!(f, "Pet not found"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::PetNotFound => Self::not_found(value.to_string()),
            _ => Self::invalid_request(value.to_string()),
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address used as the login identity.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Contains exactly one `@` with a dotted domain.
///
/// # Examples
/// ```
/// use pawcare::domain::Email;
///
/// let email = Email::new("  Jane@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "jane@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "jane@example.com")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encoded password hash as produced by a password hasher port.
///
/// The value is opaque to the domain and deliberately not serialisable.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// A pet embedded in its owner's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Identifier unique within the owner's pet list.
    pub id: PetId,
    #[schema(example = "Biscuit")]
    pub name: String,
    /// Species, e.g. dog or cat.
    #[serde(rename = "type")]
    #[schema(example = "Dog")]
    pub kind: String,
    #[serde(default)]
    pub breed: String,
    /// Age in whole years.
    #[serde(default)]
    pub age: u32,
}

/// Input for adding a pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDraft {
    name: String,
    kind: String,
    breed: String,
    age: u32,
}

impl PetDraft {
    /// Validate pet input; name and type are required.
    ///
    /// # Examples
    /// ```
    /// use pawcare::domain::{PetDraft, UserValidationError};
    ///
    /// let err = PetDraft::try_new("Rex", "  ", None, None).expect_err("type missing");
    /// assert_eq!(err, UserValidationError::PetNameAndTypeRequired);
    /// ```
    pub fn try_new(
        name: &str,
        kind: &str,
        breed: Option<String>,
        age: Option<u32>,
    ) -> Result<Self, UserValidationError> {
        let name = name.trim();
        let kind = kind.trim();
        if name.is_empty() || kind.is_empty() {
            return Err(UserValidationError::PetNameAndTypeRequired);
        }
        Ok(Self {
            name: name.to_owned(),
            kind: kind.to_owned(),
            breed: breed.unwrap_or_default(),
            age: age.unwrap_or_default(),
        })
    }

    fn into_pet(self, id: PetId) -> Pet {
        Pet {
            id,
            name: self.name,
            kind: self.kind,
            breed: self.breed,
            age: self.age,
        }
    }
}

/// Partial pet update. Blank names and types are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
}

/// Partial profile update. Blank strings leave the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A registered account together with its pets.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub phone: String,
    pub address: String,
    pub is_admin: bool,
    pub pets: Vec<Pet>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Find a pet by id.
    pub fn pet(&self, id: &PetId) -> Option<&Pet> {
        self.pets.iter().find(|pet| &pet.id == id)
    }

    /// Find a pet by the string reference stored on bookings.
    pub fn pet_by_reference(&self, reference: &str) -> Option<&Pet> {
        PetId::new(reference).ok().and_then(|id| self.pet(&id))
    }

    /// Append a pet and return its freshly assigned id.
    pub fn add_pet(&mut self, draft: PetDraft, now: DateTime<Utc>) -> PetId {
        let mut id = PetId::random();
        while self.pet(&id).is_some() {
            id = PetId::random();
        }
        self.pets.push(draft.into_pet(id));
        self.updated_at = now;
        id
    }

    /// Apply a partial update to one pet.
    pub fn update_pet(
        &mut self,
        id: &PetId,
        changes: PetChanges,
        now: DateTime<Utc>,
    ) -> Result<(), UserValidationError> {
        let pet = self
            .pets
            .iter_mut()
            .find(|pet| &pet.id == id)
            .ok_or(UserValidationError::PetNotFound)?;
        if let Some(name) = non_blank(changes.name) {
            pet.name = name.trim().to_owned();
        }
        if let Some(kind) = non_blank(changes.kind) {
            pet.kind = kind.trim().to_owned();
        }
        if let Some(breed) = changes.breed {
            pet.breed = breed;
        }
        if let Some(age) = changes.age {
            pet.age = age;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Remove one pet, keeping the remaining order.
    pub fn remove_pet(&mut self, id: &PetId, now: DateTime<Utc>) -> Result<(), UserValidationError> {
        let before = self.pets.len();
        self.pets.retain(|pet| &pet.id != id);
        if self.pets.len() == before {
            return Err(UserValidationError::PetNotFound);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Overwrite profile fields that carry a non-blank value.
    pub fn apply_profile(&mut self, changes: ProfileChanges, now: DateTime<Utc>) {
        if let Some(first_name) = non_blank(changes.first_name) {
            self.first_name = first_name.trim().to_owned();
        }
        if let Some(last_name) = non_blank(changes.last_name) {
            self.last_name = last_name.trim().to_owned();
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = non_blank(changes.phone) {
            self.phone = phone;
        }
        if let Some(address) = non_blank(changes.address) {
            self.address = address;
        }
        self.updated_at = now;
    }

    /// Public profile without password material.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            is_admin: self.is_admin,
            pets: self.pets.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Contact summary attached to bookings and appointments.
    pub fn owner_summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            pets: self.pets.clone(),
        }
    }
}

/// Serialisable account view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub is_admin: bool,
    pub pets: Vec<Pet>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner details joined onto appointments and bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub pets: Vec<Pet>,
}
