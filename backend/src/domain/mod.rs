//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports adapters implement, and the services that
//! enforce the business rules behind each endpoint.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Pet: accounts with embedded pets.
//! - Appointment, ServiceBooking: scheduled work for a pet.
//! - Product, Order: the shop.
//! - Services implementing the driving ports in [`ports`].

pub mod appointment;
pub mod auth;
pub mod error;
pub mod ids;
pub mod money;
pub mod order;
pub mod ports;
pub mod product;
pub mod schedule;
pub mod service_booking;
pub mod trace_id;
pub mod user;

mod account_service;
mod appointment_service;
mod order_service;
mod product_service;
mod service_booking_service;
mod user_admin_service;

pub use self::account_service::AccountService;
pub use self::appointment::{
    Appointment, AppointmentChanges, AppointmentDetails, AppointmentDraft, AppointmentInput,
    AppointmentService, AppointmentStatus, parse_appointment_status,
};
pub use self::appointment_service::AppointmentBookingService;
pub use self::auth::{
    Caller, LoginCredentials, Registration, RegistrationInput, SessionToken, TokenDigest,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    AppointmentId, BookingId, IdValidationError, OrderId, PetId, ProductId, UserId,
};
pub use self::money::{Price, PriceError};
pub use self::order::{
    ContactInfo, Order, OrderChanges, OrderDetails, OrderDraft, OrderInput, OrderItem,
    OrderItemDetails, OrderLine, OrderLineInput, OrderStatus, PaymentMethod, ProductDetails,
    order_total, parse_order_status,
};
pub use self::order_service::OrderService;
pub use self::product::{Product, ProductChanges, ProductDraft, ProductInput};
pub use self::product_service::ProductCatalogService;
pub use self::schedule::{Slot, SlotTime, parse_slot_date};
pub use self::service_booking::{
    BookingChanges, BookingDetails, BookingDraft, BookingInput, BookingStats, BookingStatus,
    BookingTotals, PetDetails, ServiceBooking, ServiceType, ServiceTypeCount,
    parse_booking_status,
};
pub use self::service_booking_service::ServiceBookingService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, OwnerSummary, PasswordHash, Pet, PetChanges, PetDraft, ProfileChanges, User,
    UserProfile, UserValidationError,
};
pub use self::user_admin_service::UserAdminService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pawcare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
