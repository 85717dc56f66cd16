//! Calendar slots shared by appointments and service bookings.
//!
//! A slot is a calendar date plus a minute-precision time of day. Two records
//! occupy the same slot only when both parts are exactly equal.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Examples
/// ```
/// use pawcare::domain::parse_slot_date;
///
/// assert!(parse_slot_date("2025-06-01").is_ok());
/// assert!(parse_slot_date("01/06/2025").is_err());
/// ```
pub fn parse_slot_date(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        Error::invalid_request("Invalid date").with_details(serde_json::json!({
            "field": "date",
            "value": raw,
            "expected": "YYYY-MM-DD",
        }))
    })
}

/// Time of day with minute precision, serialised as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = String, example = "10:00")]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Parse an `HH:MM` (24 hour) time.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
            .map(Self)
            .map_err(|_| {
                Error::invalid_request("Invalid time").with_details(serde_json::json!({
                    "field": "time",
                    "value": raw,
                    "expected": "HH:MM",
                }))
            })
    }

    /// Build from a stored time, truncating seconds.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|err| serde::de::Error::custom(err.message().to_owned()))
    }
}

/// A bookable (date, time) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: SlotTime,
}

impl Slot {
    pub const fn new(date: NaiveDate, time: SlotTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format(DATE_FORMAT), self.time)
    }
}
