//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain aggregates. Business rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leave this module.
//! - **Store-enforced invariants**: email uniqueness and the one-active-
//!   appointment-per-slot rule are unique constraints; violations map to the
//!   matching port error.
//!
//! # Example
//!
//! ```ignore
//! use pawcare::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pawcare")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_basic_error_mapping;
mod diesel_order_repository;
mod diesel_product_repository;
mod diesel_service_booking_repository;
mod diesel_session_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_service_booking_repository::DieselServiceBookingRepository;
pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
