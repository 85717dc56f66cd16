//! Shared helpers for the HTTP integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the in-memory wiring lives here rather than in each test file.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use zeroize::Zeroizing;

use pawcare::Trace;
use pawcare::domain::UserAdminService;
use pawcare::inbound::http::configure;
use pawcare::inbound::http::state::{Adapters, HttpState};
use pawcare::outbound::memory::{
    MemoryAppointmentRepository, MemoryOrderRepository, MemoryProductRepository,
    MemoryServiceBookingRepository, MemorySessionRepository, MemoryUserRepository,
};
use pawcare::outbound::security::Argon2PasswordHasher;

pub const PASSWORD: &str = "hunter22";
pub const ADMIN_EMAIL: &str = "admin@pawcare.test";

/// HTTP state over fresh in-memory stores with a bootstrap admin.
pub async fn memory_state() -> web::Data<HttpState> {
    let hasher = Argon2PasswordHasher::with_cost(1024, 1).expect("argon2 params");
    let adapters = Adapters {
        users: Arc::new(MemoryUserRepository::new()),
        sessions: Arc::new(MemorySessionRepository::new()),
        hasher: Arc::new(hasher),
        appointments: Arc::new(MemoryAppointmentRepository::new()),
        bookings: Arc::new(MemoryServiceBookingRepository::new()),
        products: Arc::new(MemoryProductRepository::new()),
        orders: Arc::new(MemoryOrderRepository::new()),
    };
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    UserAdminService::new(
        adapters.users.clone(),
        adapters.sessions.clone(),
        adapters.hasher.clone(),
        clock.clone(),
    )
    .ensure_admin(ADMIN_EMAIL, Zeroizing::new(PASSWORD.to_owned()))
    .await
    .expect("admin bootstrap");
    web::Data::new(HttpState::assemble(adapters, clock, Duration::days(30)))
}

/// The production router shape: trace middleware around `/api`.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure))
}

/// Send a request and decode the JSON body (null when empty).
pub async fn send<S, B>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

pub fn registration(first_name: &str, email: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Tester",
        "email": email,
        "password": PASSWORD
    })
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Register an account and return its bearer token.
pub async fn register<S, B>(app: &S, first_name: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration(first_name, email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

/// Log in as the bootstrap admin.
pub async fn admin_token<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": ADMIN_EMAIL, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}
