//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, web};
use chrono::Duration;
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::{AuthenticatedAccount, UserRepository};
use crate::domain::{
    Caller, PetDraft, PetId, Product, ProductInput, RegistrationInput, SessionToken, UserId,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{Adapters, HttpState};
use crate::outbound::memory::{
    MemoryAppointmentRepository, MemoryOrderRepository, MemoryProductRepository,
    MemoryServiceBookingRepository, MemorySessionRepository, MemoryUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

pub const TEST_PASSWORD: &str = "hunter22";

/// In-memory backend with a cheap password hasher.
pub struct TestBackend {
    users: Arc<MemoryUserRepository>,
    state: web::Data<HttpState>,
}

impl TestBackend {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::new());
        let hasher = Argon2PasswordHasher::with_cost(1024, 1).expect("argon2 params");
        let state = HttpState::assemble(
            Adapters {
                users: users.clone(),
                sessions: Arc::new(MemorySessionRepository::new()),
                hasher: Arc::new(hasher),
                appointments: Arc::new(MemoryAppointmentRepository::new()),
                bookings: Arc::new(MemoryServiceBookingRepository::new()),
                products: Arc::new(MemoryProductRepository::new()),
                orders: Arc::new(MemoryOrderRepository::new()),
            },
            Arc::new(DefaultClock),
            Duration::days(30),
        );
        Self {
            users,
            state: web::Data::new(state),
        }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// The `/api` router over this backend's state.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state())
            .service(web::scope("/api").configure(configure))
    }

    /// Register a member account named after the mailbox.
    pub async fn register(&self, email: &str) -> AuthenticatedAccount {
        let input = RegistrationInput {
            first_name: "Test".to_owned(),
            last_name: email.split('@').next().unwrap_or("user").to_owned(),
            email: email.to_owned(),
            password: Zeroizing::new(TEST_PASSWORD.to_owned()),
            ..RegistrationInput::default()
        };
        self.state
            .accounts
            .register(input)
            .await
            .expect("registration succeeds")
    }

    /// Register an account and flip its admin flag in the store.
    pub async fn register_admin(&self, email: &str) -> AuthenticatedAccount {
        let mut account = self.register(email).await;
        let mut user = self
            .users
            .find_by_id(&account.profile.id)
            .await
            .expect("store reachable")
            .expect("user stored");
        user.is_admin = true;
        self.users.update(&user).await.expect("admin promoted");
        account.profile.is_admin = true;
        account
    }

    /// Give the account a dog called `name` and return its id.
    pub async fn add_pet(&self, account: &AuthenticatedAccount, name: &str) -> PetId {
        let draft = PetDraft::try_new(name, "Dog", Some("Beagle".to_owned()), Some(3))
            .expect("valid pet");
        let profile = self
            .state
            .accounts
            .add_pet(&Caller::new(account.profile.id, false), draft)
            .await
            .expect("pet added");
        profile.pets.last().expect("pet listed").id
    }

    pub async fn add_product(&self, name: &str, price: f64, category: &str) -> Product {
        let input = ProductInput {
            name: Some(name.to_owned()),
            price: Some(price),
            category: Some(category.to_owned()),
            ..ProductInput::default()
        };
        self.state
            .products
            .create(&Caller::new(UserId::random(), true), input)
            .await
            .expect("product created")
    }
}

/// `Authorization: Bearer <token>` header pair.
pub fn bearer(token: &SessionToken) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token.expose()))
}
