//! In-process adapters for the driven repository ports.
//!
//! Used when no database URL is configured and by the HTTP tests. Each store
//! keeps its records behind a single `tokio` mutex, so every check-then-write
//! sequence (email uniqueness, slot conflicts) runs atomically.

mod appointments;
mod bookings;
mod orders;
mod products;
mod sessions;
mod users;

pub use appointments::MemoryAppointmentRepository;
pub use bookings::MemoryServiceBookingRepository;
pub use orders::MemoryOrderRepository;
pub use products::MemoryProductRepository;
pub use sessions::MemorySessionRepository;
pub use users::MemoryUserRepository;
