//! Builders for HTTP state over database or in-memory adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use pawcare::domain::UserAdminService;
use pawcare::domain::ports::{
    AppointmentRepository, OrderRepository, ProductRepository, ServiceBookingRepository,
    SessionRepository, UserRepository,
};
use pawcare::inbound::http::state::{Adapters, HttpState};
use pawcare::outbound::memory::{
    MemoryAppointmentRepository, MemoryOrderRepository, MemoryProductRepository,
    MemoryServiceBookingRepository, MemorySessionRepository, MemoryUserRepository,
};
use pawcare::outbound::persistence::{
    DieselAppointmentRepository, DieselOrderRepository, DieselProductRepository,
    DieselServiceBookingRepository, DieselSessionRepository, DieselUserRepository,
};
use pawcare::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

type ArgonAdapters<U, S, A, B, P, O> = Adapters<U, S, Argon2PasswordHasher, A, B, P, O>;

/// Bootstrap the configured admin, then wire the services.
async fn finish<U, S, A, B, P, O>(
    config: &ServerConfig,
    adapters: ArgonAdapters<U, S, A, B, P, O>,
) -> std::io::Result<HttpState>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    A: AppointmentRepository + 'static,
    B: ServiceBookingRepository + 'static,
    P: ProductRepository + 'static,
    O: OrderRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if let Some((email, password)) = &config.admin {
        let admin = UserAdminService::new(
            adapters.users.clone(),
            adapters.sessions.clone(),
            adapters.hasher.clone(),
            clock.clone(),
        );
        let profile = admin
            .ensure_admin(email, password.clone())
            .await
            .map_err(|err| std::io::Error::other(format!("admin bootstrap failed: {err}")))?;
        info!(user_id = %profile.id, "bootstrap admin ready");
    }
    Ok(HttpState::assemble(adapters, clock, config.session_ttl))
}

/// Build the shared HTTP state, preferring PostgreSQL when a pool is configured.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => {
            finish(
                config,
                Adapters {
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    sessions: Arc::new(DieselSessionRepository::new(pool.clone())),
                    hasher,
                    appointments: Arc::new(DieselAppointmentRepository::new(pool.clone())),
                    bookings: Arc::new(DieselServiceBookingRepository::new(pool.clone())),
                    products: Arc::new(DieselProductRepository::new(pool.clone())),
                    orders: Arc::new(DieselOrderRepository::new(pool.clone())),
                },
            )
            .await?
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            finish(
                config,
                Adapters {
                    users: Arc::new(MemoryUserRepository::new()),
                    sessions: Arc::new(MemorySessionRepository::new()),
                    hasher,
                    appointments: Arc::new(MemoryAppointmentRepository::new()),
                    bookings: Arc::new(MemoryServiceBookingRepository::new()),
                    products: Arc::new(MemoryProductRepository::new()),
                    orders: Arc::new(MemoryOrderRepository::new()),
                },
            )
            .await?
        }
    };
    Ok(web::Data::new(state))
}
