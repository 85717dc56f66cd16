//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, password hashing) are implemented by outbound
//! adapters. Driving ports (commands, queries, the authenticator) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod appointment_command;
mod appointment_query;
mod appointment_repository;
mod authenticator;
mod order_command;
mod order_query;
mod order_repository;
mod password_hasher;
mod product_command;
mod product_query;
mod product_repository;
mod service_booking_command;
mod service_booking_query;
mod service_booking_repository;
mod session_repository;
mod user_administration;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, AccountUpdate, AuthenticatedAccount};
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use appointment_command::MockAppointmentCommand;
pub use appointment_command::AppointmentCommand;
#[cfg(test)]
pub use appointment_query::MockAppointmentQuery;
pub use appointment_query::AppointmentQuery;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::OrderCommand;
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::OrderQuery;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use product_command::MockProductCommand;
pub use product_command::ProductCommand;
#[cfg(test)]
pub use product_query::MockProductQuery;
pub use product_query::ProductQuery;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use service_booking_command::MockServiceBookingCommand;
pub use service_booking_command::ServiceBookingCommand;
#[cfg(test)]
pub use service_booking_query::MockServiceBookingQuery;
pub use service_booking_query::ServiceBookingQuery;
#[cfg(test)]
pub use service_booking_repository::MockServiceBookingRepository;
pub use service_booking_repository::{ServiceBookingRepository, ServiceBookingRepositoryError};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionRecord, SessionRepository, SessionRepositoryError};
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::UserAdministration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
