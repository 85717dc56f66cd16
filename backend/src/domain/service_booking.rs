//! Ad-hoc service bookings (taxi, home visit, boarding) and their statistics.
//!
//! Unlike appointments, bookings are not checked for slot conflicts.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, Error, OwnerSummary, Pet, Price, SlotTime, UserId, parse_slot_date};

/// Kind of service being booked. Labels keep their spaces on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum ServiceType {
    #[serde(rename = "Pet Taxi")]
    PetTaxi,
    #[serde(rename = "Home Visit")]
    HomeVisit,
    #[serde(rename = "Pet Boarding")]
    PetBoarding,
}

impl ServiceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PetTaxi => "Pet Taxi",
            Self::HomeVisit => "Home Visit",
            Self::PetBoarding => "Pet Boarding",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown service type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid service type")]
pub struct ParseServiceTypeError;

impl FromStr for ServiceType {
    type Err = ParseServiceTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pet Taxi" => Ok(Self::PetTaxi),
            "Home Visit" => Ok(Self::HomeVisit),
            "Pet Boarding" => Ok(Self::PetBoarding),
            _ => Err(ParseServiceTypeError),
        }
    }
}

/// Booking lifecycle state; unlike appointments this includes `completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a booking status outside the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status")]
pub struct ParseBookingStatusError;

impl FromStr for BookingStatus {
    type Err = ParseBookingStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseBookingStatusError),
        }
    }
}

/// Parse a client-supplied booking status.
pub fn parse_booking_status(raw: &str) -> Result<BookingStatus, Error> {
    raw.parse()
        .map_err(|err: ParseBookingStatusError| Error::invalid_request(err.to_string()))
}

fn parse_service_type(raw: &str) -> Result<ServiceType, Error> {
    raw.parse()
        .map_err(|err: ParseServiceTypeError| Error::invalid_request(err.to_string()))
}

fn parse_price(amount: f64) -> Result<Price, Error> {
    Price::from_decimal(amount).map_err(|_| Error::invalid_request("Invalid price"))
}

/// A persisted service booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBooking {
    pub id: BookingId,
    pub user_id: UserId,
    /// Identifier of one of the owner's pets, as a string.
    pub pet: String,
    pub service_type: ServiceType,
    #[schema(value_type = String, format = Date, example = "2025-06-01")]
    pub date: NaiveDate,
    pub time: SlotTime,
    pub address: String,
    pub notes: String,
    pub status: BookingStatus,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw booking fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingInput {
    pub pet: Option<String>,
    pub service_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validated input for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub pet: String,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub address: String,
    pub notes: String,
    pub price: Price,
}

impl BookingDraft {
    /// Validate creation input; every field except notes is required.
    pub fn try_from_input(input: &BookingInput) -> Result<Self, Error> {
        let (Some(pet), Some(service_type), Some(date), Some(time), Some(address), Some(price)) = (
            present(input.pet.as_ref()),
            present(input.service_type.as_ref()),
            present(input.date.as_ref()),
            present(input.time.as_ref()),
            present(input.address.as_ref()),
            input.price,
        ) else {
            return Err(Error::invalid_request("All fields are required"));
        };
        Ok(Self {
            pet: pet.to_owned(),
            service_type: parse_service_type(service_type)?,
            date: parse_slot_date(date)?,
            time: SlotTime::parse(time)?,
            address: address.to_owned(),
            notes: input.notes.clone().unwrap_or_default(),
            price: parse_price(price)?,
        })
    }
}

/// Validated partial update. Blank strings are ignored; notes are
/// overwritten whenever present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    pub pet: Option<String>,
    pub service_type: Option<ServiceType>,
    pub date: Option<NaiveDate>,
    pub time: Option<SlotTime>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub price: Option<Price>,
    pub status: Option<BookingStatus>,
}

impl BookingChanges {
    pub fn try_from_input(input: &BookingInput) -> Result<Self, Error> {
        Ok(Self {
            pet: present(input.pet.as_ref()).map(str::to_owned),
            service_type: present(input.service_type.as_ref())
                .map(parse_service_type)
                .transpose()?,
            date: present(input.date.as_ref())
                .map(parse_slot_date)
                .transpose()?,
            time: present(input.time.as_ref())
                .map(SlotTime::parse)
                .transpose()?,
            address: present(input.address.as_ref()).map(str::to_owned),
            notes: input.notes.clone(),
            price: input.price.map(parse_price).transpose()?,
            status: present(input.status.as_ref())
                .map(parse_booking_status)
                .transpose()?,
        })
    }

    pub fn apply(self, booking: &mut ServiceBooking, now: DateTime<Utc>) {
        if let Some(pet) = self.pet {
            booking.pet = pet;
        }
        if let Some(service_type) = self.service_type {
            booking.service_type = service_type;
        }
        if let Some(date) = self.date {
            booking.date = date;
        }
        if let Some(time) = self.time {
            booking.time = time;
        }
        if let Some(address) = self.address {
            booking.address = address;
        }
        if let Some(notes) = self.notes {
            booking.notes = notes;
        }
        if let Some(price) = self.price {
            booking.price = price;
        }
        if let Some(status) = self.status {
            booking.status = status;
        }
        booking.updated_at = now;
    }
}

/// Pet fields shown alongside a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetDetails {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub breed: String,
    pub age: u32,
}

impl From<&Pet> for PetDetails {
    fn from(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            kind: pet.kind.clone(),
            breed: pet.breed.clone(),
            age: pet.age,
        }
    }
}

/// Booking joined with owner details and the referenced pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: ServiceBooking,
    pub user: Option<OwnerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_details: Option<PetDetails>,
}

impl BookingDetails {
    /// Join a booking with its owner, resolving the pet reference.
    pub fn join(booking: ServiceBooking, owner: Option<OwnerSummary>) -> Self {
        let pet_details = owner.as_ref().and_then(|owner| {
            owner
                .pets
                .iter()
                .find(|pet| pet.id.to_string() == booking.pet)
                .map(PetDetails::from)
        });
        Self {
            booking,
            user: owner,
            pet_details,
        }
    }
}

/// Totals across every booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingTotals {
    pub total_bookings: u64,
    pub total_revenue: Price,
    pub average_price: Price,
}

/// Booking count for one service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeCount {
    pub service_type: ServiceType,
    pub count: u64,
}

/// Aggregate booking statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub overall: BookingTotals,
    /// Sorted by count descending, then label ascending.
    pub by_service: Vec<ServiceTypeCount>,
}

impl BookingStats {
    /// Aggregate a set of bookings.
    ///
    /// # Examples
    /// ```
    /// use pawcare::domain::BookingStats;
    ///
    /// let stats = BookingStats::from_bookings(&[]).expect("empty stats");
    /// assert_eq!(stats.overall.total_bookings, 0);
    /// assert!(stats.by_service.is_empty());
    /// ```
    pub fn from_bookings(bookings: &[ServiceBooking]) -> Result<Self, Error> {
        let total_revenue: Result<Price, _> = bookings.iter().map(|b| b.price).sum();
        let total_revenue =
            total_revenue.map_err(|err| Error::internal(format!("revenue overflow: {err}")))?;
        let total_bookings = bookings.len() as u64;

        let mut counts: HashMap<ServiceType, u64> = HashMap::new();
        for booking in bookings {
            *counts.entry(booking.service_type).or_default() += 1;
        }
        let mut by_service: Vec<ServiceTypeCount> = counts
            .into_iter()
            .map(|(service_type, count)| ServiceTypeCount {
                service_type,
                count,
            })
            .collect();
        by_service.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.service_type.as_str().cmp(b.service_type.as_str()))
        });

        Ok(Self {
            overall: BookingTotals {
                total_bookings,
                total_revenue,
                average_price: Price::average(total_revenue, total_bookings),
            },
            by_service,
        })
    }
}
