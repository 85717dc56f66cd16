//! UUID-backed identifiers for every addressable record.
//!
//! Identifiers serialise as their hyphenated string form so they can travel
//! through JSON bodies and URL path segments unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier string was empty.
    #[error("{kind} id must not be empty")]
    Empty {
        /// Record kind the identifier belongs to.
        kind: &'static str,
    },
    /// The identifier string was not a UUID.
    #[error("{kind} id must be a valid UUID")]
    Invalid {
        /// Record kind the identifier belongs to.
        kind: &'static str,
    },
}

macro_rules! define_id {
    ($(#[$outer:meta])* $name:ident => $kind:literal) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(try_from = "String", into = "String")]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::Invalid { kind: $kind })
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_id! {
    /// Stable identifier of a registered user.
    UserId => "user"
}

define_id! {
    /// Identifier of a pet, unique within its owner's pet list.
    PetId => "pet"
}

define_id! {
    /// Identifier of a clinic appointment.
    AppointmentId => "appointment"
}

define_id! {
    /// Identifier of an ad-hoc service booking.
    BookingId => "booking"
}

define_id! {
    /// Identifier of a catalog product.
    ProductId => "product"
}

define_id! {
    /// Identifier of a placed order.
    OrderId => "order"
}
