//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AppointmentCommand, AppointmentQuery, AppointmentRepository,
    Authenticator, OrderCommand, OrderQuery, OrderRepository, PasswordHasher, ProductCommand,
    ProductQuery, ProductRepository, ServiceBookingCommand, ServiceBookingQuery,
    ServiceBookingRepository, SessionRepository, UserAdministration, UserRepository,
};
use crate::domain::{
    AccountService, AppointmentBookingService, OrderService, ProductCatalogService,
    ServiceBookingService, UserAdminService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub authenticator: Arc<dyn Authenticator>,
    pub user_admin: Arc<dyn UserAdministration>,
    pub appointments: Arc<dyn AppointmentCommand>,
    pub appointments_query: Arc<dyn AppointmentQuery>,
    pub bookings: Arc<dyn ServiceBookingCommand>,
    pub bookings_query: Arc<dyn ServiceBookingQuery>,
    pub products: Arc<dyn ProductCommand>,
    pub products_query: Arc<dyn ProductQuery>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
}

/// Driven adapters the HTTP state is assembled from.
pub struct Adapters<U, S, H, A, B, P, O> {
    pub users: Arc<U>,
    pub sessions: Arc<S>,
    pub hasher: Arc<H>,
    pub appointments: Arc<A>,
    pub bookings: Arc<B>,
    pub products: Arc<P>,
    pub orders: Arc<O>,
}

impl HttpState {
    /// Wire the domain services over one set of driven adapters.
    pub fn assemble<U, S, H, A, B, P, O>(
        adapters: Adapters<U, S, H, A, B, P, O>,
        clock: Arc<dyn Clock>,
        session_ttl: Duration,
    ) -> Self
    where
        U: UserRepository + 'static,
        S: SessionRepository + 'static,
        H: PasswordHasher + 'static,
        A: AppointmentRepository + 'static,
        B: ServiceBookingRepository + 'static,
        P: ProductRepository + 'static,
        O: OrderRepository + 'static,
    {
        let Adapters {
            users,
            sessions,
            hasher,
            appointments,
            bookings,
            products,
            orders,
        } = adapters;

        let accounts = Arc::new(
            AccountService::new(
                users.clone(),
                sessions.clone(),
                hasher.clone(),
                clock.clone(),
            )
            .with_session_ttl(session_ttl),
        );
        let user_admin = Arc::new(UserAdminService::new(
            users.clone(),
            sessions,
            hasher,
            clock.clone(),
        ));
        let appointment_service = Arc::new(AppointmentBookingService::new(
            appointments,
            users.clone(),
            clock.clone(),
        ));
        let booking_service = Arc::new(ServiceBookingService::new(bookings, users, clock.clone()));
        let catalog = Arc::new(ProductCatalogService::new(products.clone(), clock.clone()));
        let order_service = Arc::new(OrderService::new(orders, products, clock));

        Self {
            accounts: accounts.clone(),
            accounts_query: accounts.clone(),
            authenticator: accounts,
            user_admin,
            appointments: appointment_service.clone(),
            appointments_query: appointment_service,
            bookings: booking_service.clone(),
            bookings_query: booking_service,
            products: catalog.clone(),
            products_query: catalog,
            orders: order_service.clone(),
            orders_query: order_service,
        }
    }
}
