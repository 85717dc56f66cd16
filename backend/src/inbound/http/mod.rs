//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod admin_users;
pub mod appointments;
pub mod auth;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod services;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;
use error::{json_error_handler, path_error_handler, query_error_handler};

/// Register every `/api` handler and the extractor error handlers.
///
/// Literal segments are registered before their `{id}` siblings so
/// `/services/stats` or `/orders/myorders` never parse as identifiers.
///
/// ```no_run
/// use actix_web::{App, web};
/// use pawcare::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        // auth
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::me)
        .service(accounts::update_profile)
        .service(accounts::delete_account)
        .service(accounts::add_pet)
        .service(accounts::update_pet)
        .service(accounts::delete_pet)
        .service(admin_users::list_users)
        .service(admin_users::create_user)
        .service(admin_users::get_user)
        .service(admin_users::update_user)
        .service(admin_users::delete_user)
        // appointments
        .service(appointments::list_appointments)
        .service(appointments::create_appointment)
        .service(appointments::get_appointment)
        .service(appointments::update_appointment)
        .service(appointments::update_appointment_status)
        .service(appointments::delete_appointment)
        // services
        .service(services::book_service)
        .service(services::my_bookings)
        .service(services::booking_stats)
        .service(services::list_bookings)
        .service(services::get_booking)
        .service(services::update_booking)
        .service(services::update_booking_status)
        .service(services::delete_booking)
        // products
        .service(products::list_products)
        .service(products::list_products_by_category)
        .service(products::create_product)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::delete_product)
        // orders
        .service(orders::create_order)
        .service(orders::my_orders)
        .service(orders::list_orders)
        .service(orders::get_order)
        .service(orders::update_order_status)
        .service(orders::update_order)
        .service(orders::delete_order);
}
