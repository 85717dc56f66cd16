//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api` handler and the health probes. Schemas
//! referenced by request and response bodies are registered automatically.
//! Swagger UI serves the document at `/docs` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Opaque token issued by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PawCare API",
        description = "Pet owners, their appointments and service bookings, and the shop."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::me,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::accounts::add_pet,
        crate::inbound::http::accounts::update_pet,
        crate::inbound::http::accounts::delete_pet,
        crate::inbound::http::admin_users::list_users,
        crate::inbound::http::admin_users::create_user,
        crate::inbound::http::admin_users::get_user,
        crate::inbound::http::admin_users::update_user,
        crate::inbound::http::admin_users::delete_user,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::appointments::create_appointment,
        crate::inbound::http::appointments::get_appointment,
        crate::inbound::http::appointments::update_appointment,
        crate::inbound::http::appointments::update_appointment_status,
        crate::inbound::http::appointments::delete_appointment,
        crate::inbound::http::services::book_service,
        crate::inbound::http::services::my_bookings,
        crate::inbound::http::services::booking_stats,
        crate::inbound::http::services::list_bookings,
        crate::inbound::http::services::get_booking,
        crate::inbound::http::services::update_booking,
        crate::inbound::http::services::update_booking_status,
        crate::inbound::http::services::delete_booking,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::list_products_by_category,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::my_orders,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::update_order_status,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    tags(
        (name = "auth", description = "Registration, login and the caller's own profile"),
        (name = "users", description = "Admin user management"),
        (name = "appointments", description = "Clinic appointments"),
        (name = "services", description = "Taxi, home visit and boarding bookings"),
        (name = "products", description = "Shop catalog"),
        (name = "orders", description = "Shop orders"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
