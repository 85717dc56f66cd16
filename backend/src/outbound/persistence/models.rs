//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each row converts to and from its domain
//! aggregate; decoding failures surface as [`RowError`] and are reported by
//! repositories as query errors.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentId, BookingId, ContactInfo, Email, Order, OrderId, OrderItem,
    PasswordHash, Pet, Price, Product, ProductId, ServiceBooking, SlotTime, User, UserId,
};

use super::schema::{appointments, orders, products, service_bookings, sessions, users};

/// A stored value that no longer satisfies the domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{column}: {message}")]
pub(crate) struct RowError {
    column: &'static str,
    message: String,
}

impl RowError {
    fn new(column: &'static str, message: impl ToString) -> Self {
        Self {
            column,
            message: message.to_string(),
        }
    }
}

fn price(column: &'static str, cents: i64) -> Result<Price, RowError> {
    Price::from_cents(cents).map_err(|err| RowError::new(column, err))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub is_admin: bool,
    pub pets: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn from_domain(user: &User) -> Result<Self, RowError> {
        Ok(Self {
            id: *user.id.as_uuid(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.to_string(),
            password_hash: user.password_hash.as_str().to_owned(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            is_admin: user.is_admin,
            pets: serde_json::to_value(&user.pets).map_err(|err| RowError::new("pets", err))?,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = RowError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let pets: Vec<Pet> =
            serde_json::from_value(row.pets).map_err(|err| RowError::new("pets", err))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: Email::new(&row.email).map_err(|err| RowError::new("email", err))?,
            password_hash: PasswordHash::new(row.password_hash),
            phone: row.phone,
            address: row.address,
            is_admin: row.is_admin,
            pets,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub token_digest: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Appointment> for AppointmentRow {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: *appointment.id.as_uuid(),
            user_id: *appointment.user_id.as_uuid(),
            pet: appointment.pet.clone(),
            service: appointment.service.as_str().to_owned(),
            date: appointment.date,
            time: appointment.time.as_naive(),
            notes: appointment.notes.clone(),
            status: appointment.status.as_str().to_owned(),
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RowError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AppointmentId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            pet: row.pet,
            service: row
                .service
                .parse()
                .map_err(|err| RowError::new("service", err))?,
            date: row.date,
            time: SlotTime::from_naive(row.time),
            notes: row.notes,
            status: row
                .status
                .parse()
                .map_err(|err| RowError::new("status", err))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Service bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = service_bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceBookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub address: String,
    pub notes: String,
    pub status: String,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ServiceBooking> for ServiceBookingRow {
    fn from(booking: &ServiceBooking) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            user_id: *booking.user_id.as_uuid(),
            pet: booking.pet.clone(),
            service_type: booking.service_type.as_str().to_owned(),
            date: booking.date,
            time: booking.time.as_naive(),
            address: booking.address.clone(),
            notes: booking.notes.clone(),
            status: booking.status.as_str().to_owned(),
            price_cents: booking.price.cents(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

impl TryFrom<ServiceBookingRow> for ServiceBooking {
    type Error = RowError;

    fn try_from(row: ServiceBookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            pet: row.pet,
            service_type: row
                .service_type
                .parse()
                .map_err(|err| RowError::new("service_type", err))?,
            date: row.date,
            time: SlotTime::from_naive(row.time),
            address: row.address,
            notes: row.notes,
            status: row
                .status
                .parse()
                .map_err(|err| RowError::new("status", err))?,
            price: price("price_cents", row.price_cents)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: f64,
    pub reviews: i32,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub(crate) fn from_domain(product: &Product) -> Result<Self, RowError> {
        Ok(Self {
            id: *product.id.as_uuid(),
            name: product.name.clone(),
            price_cents: product.price.cents(),
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            rating: product.rating,
            reviews: i32::try_from(product.reviews)
                .map_err(|err| RowError::new("reviews", err))?,
            is_new: product.is_new,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RowError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            price: price("price_cents", row.price_cents)?,
            image: row.image,
            category: row.category,
            description: row.description,
            rating: row.rating,
            reviews: u32::try_from(row.reviews).map_err(|err| RowError::new("reviews", err))?,
            is_new: row.is_new,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// JSON shape of one element of `orders.items`. Prices stay in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct StoredOrderItem {
    product: Uuid,
    quantity: u32,
    price_cents: i64,
}

impl From<&OrderItem> for StoredOrderItem {
    fn from(item: &OrderItem) -> Self {
        Self {
            product: *item.product.as_uuid(),
            quantity: item.quantity,
            price_cents: item.price.cents(),
        }
    }
}

impl TryFrom<StoredOrderItem> for OrderItem {
    type Error = RowError;

    fn try_from(item: StoredOrderItem) -> Result<Self, Self::Error> {
        Ok(Self {
            product: ProductId::from_uuid(item.product),
            quantity: item.quantity,
            price: price("items.price_cents", item.price_cents)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: serde_json::Value,
    pub total_cents: i64,
    pub shipping_address: String,
    pub contact_info: serde_json::Value,
    pub payment_method: String,
    pub delivery_notes: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub(crate) fn from_domain(order: &Order) -> Result<Self, RowError> {
        let items: Vec<StoredOrderItem> = order.items.iter().map(StoredOrderItem::from).collect();
        Ok(Self {
            id: *order.id.as_uuid(),
            user_id: *order.user_id.as_uuid(),
            items: serde_json::to_value(items).map_err(|err| RowError::new("items", err))?,
            total_cents: order.total_amount.cents(),
            shipping_address: order.shipping_address.clone(),
            contact_info: serde_json::to_value(&order.contact_info)
                .map_err(|err| RowError::new("contact_info", err))?,
            payment_method: order.payment_method.as_str().to_owned(),
            delivery_notes: order.delivery_notes.clone(),
            status: order.status.as_str().to_owned(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = RowError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<StoredOrderItem> =
            serde_json::from_value(row.items).map_err(|err| RowError::new("items", err))?;
        let contact_info: ContactInfo = serde_json::from_value(row.contact_info)
            .map_err(|err| RowError::new("contact_info", err))?;
        Ok(Self {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            items: items
                .into_iter()
                .map(OrderItem::try_from)
                .collect::<Result<_, _>>()?,
            total_amount: price("total_cents", row.total_cents)?,
            shipping_address: row.shipping_address,
            contact_info,
            payment_method: row
                .payment_method
                .parse()
                .map_err(|err| RowError::new("payment_method", err))?,
            delivery_notes: row.delivery_notes,
            status: row
                .status
                .parse()
                .map_err(|err| RowError::new("status", err))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
