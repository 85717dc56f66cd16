//! Service booking handlers under `/api/services`.
//!
//! Literal paths (`/book`, `/my-bookings`, `/stats`) must be registered ahead
//! of `/{id}` so they are not captured as identifiers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingDetails, BookingId, BookingInput, BookingStats, Error, ServiceBooking};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::MessageResponse;
use crate::inbound::http::appointments::StatusRequest;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID, parse_id};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Name or id of one of the owner's pets.
    pub pet: Option<String>,
    #[schema(example = "Pet Taxi")]
    pub service_type: Option<String>,
    #[schema(example = "2025-06-01")]
    pub date: Option<String>,
    #[schema(example = "09:30")]
    pub time: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
}

impl From<BookingRequest> for BookingInput {
    fn from(value: BookingRequest) -> Self {
        Self {
            pet: value.pet,
            service_type: value.service_type,
            date: value.date,
            time: value.time,
            address: value.address,
            notes: value.notes,
            price: value.price,
            status: value.status,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/services/book",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ServiceBooking),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["services"],
    operation_id = "bookService"
)]
#[post("/services/book")]
pub async fn book_service(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookingRequest>,
) -> ApiResult<HttpResponse> {
    let booking = state
        .bookings
        .create(session.caller(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(booking))
}

#[utoipa::path(
    get,
    path = "/api/services/my-bookings",
    responses(
        (status = 200, description = "Caller's bookings, newest date first", body = [BookingDetails]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["services"],
    operation_id = "myBookings"
)]
#[get("/services/my-bookings")]
pub async fn my_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingDetails>>> {
    let bookings = state.bookings_query.list_mine(session.caller()).await?;
    Ok(web::Json(bookings))
}

#[utoipa::path(
    get,
    path = "/api/services/stats",
    responses(
        (status = 200, description = "Totals and per-service counts", body = BookingStats),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["services"],
    operation_id = "bookingStats"
)]
#[get("/services/stats")]
pub async fn booking_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<BookingStats>> {
    let stats = state.bookings_query.stats(session.caller()).await?;
    Ok(web::Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/services",
    responses(
        (status = 200, description = "Every booking", body = [BookingDetails]),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["services"],
    operation_id = "listBookings"
)]
#[get("/services")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingDetails>>> {
    let bookings = state.bookings_query.list_all(session.caller()).await?;
    Ok(web::Json(bookings))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    params(("id" = String, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking", body = BookingDetails),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Booking not found", body = Error)
    ),
    tags = ["services"],
    operation_id = "getBooking"
)]
#[get("/services/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingDetails>> {
    let id: BookingId = parse_id(&path, ID)?;
    let booking = state.bookings_query.get(session.caller(), &id).await?;
    Ok(web::Json(booking))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    params(("id" = String, Path, description = "Booking identifier")),
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = ServiceBooking),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Booking not found", body = Error)
    ),
    tags = ["services"],
    operation_id = "updateBooking"
)]
#[put("/services/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<BookingRequest>,
) -> ApiResult<web::Json<ServiceBooking>> {
    let id: BookingId = parse_id(&path, ID)?;
    let booking = state
        .bookings
        .update(session.caller(), &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(booking))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}/status",
    params(("id" = String, Path, description = "Booking identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ServiceBooking),
        (status = 400, description = "Invalid status", body = Error),
        (status = 404, description = "Booking not found", body = Error)
    ),
    tags = ["services"],
    operation_id = "updateBookingStatus"
)]
#[put("/services/{id}/status")]
pub async fn update_booking_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<ServiceBooking>> {
    let id: BookingId = parse_id(&path, ID)?;
    let booking = state
        .bookings
        .update_status(session.caller(), &id, payload.into_inner().into_status())
        .await?;
    Ok(web::Json(booking))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = String, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking removed", body = MessageResponse),
        (status = 404, description = "Booking not found", body = Error)
    ),
    tags = ["services"],
    operation_id = "deleteBooking"
)]
#[delete("/services/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: BookingId = parse_id(&path, ID)?;
    state.bookings.delete(session.caller(), &id).await?;
    Ok(web::Json(MessageResponse::new("Booking removed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::AuthenticatedAccount;
    use crate::inbound::http::test_utils::{TestBackend, bearer};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    async fn with_pet(backend: &TestBackend, email: &str) -> (AuthenticatedAccount, String) {
        let account = backend.register(email).await;
        let pet = backend.add_pet(&account, "Biscuit").await;
        (account, pet.to_string())
    }

    fn taxi(pet: &str, price: f64) -> Value {
        json!({
            "pet": pet,
            "serviceType": "Pet Taxi",
            "date": "2025-06-01",
            "time": "09:30",
            "address": "1 Kennel Lane",
            "price": price
        })
    }

    #[actix_web::test]
    async fn bookings_carry_pet_details_for_their_owner() {
        let backend = TestBackend::new();
        let (jane, pet) = with_pet(&backend, "jane@example.com").await;
        let app = test::init_service(backend.app()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/services/book")
                .insert_header(bearer(&jane.token))
                .set_json(taxi(&pet, 25.5))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(response).await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["price"], 25.5);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/services/my-bookings")
                .insert_header(bearer(&jane.token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let listed: Value = test::read_body_json(response).await;
        assert_eq!(listed[0]["petDetails"]["breed"], "Beagle");
        assert_eq!(listed[0]["user"]["email"], "jane@example.com");
    }

    #[actix_web::test]
    async fn upper_case_pet_ids_keep_their_pet_details() {
        let backend = TestBackend::new();
        let (jane, pet) = with_pet(&backend, "jane@example.com").await;
        let app = test::init_service(backend.app()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/services/book")
                .insert_header(bearer(&jane.token))
                .set_json(taxi(&pet.to_uppercase(), 15.0))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(response).await;
        assert_eq!(created["pet"], pet);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/services/my-bookings")
                .insert_header(bearer(&jane.token))
                .to_request(),
        )
        .await;
        let listed: Value = test::read_body_json(response).await;
        assert_eq!(listed[0]["petDetails"]["name"], "Biscuit");
    }

    #[actix_web::test]
    async fn unknown_service_type_is_rejected() {
        let backend = TestBackend::new();
        let (jane, pet) = with_pet(&backend, "jane@example.com").await;
        let app = test::init_service(backend.app()).await;

        let mut body = taxi(&pet, 10.0);
        body["serviceType"] = json!("Pet Spa");
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/services/book")
                .insert_header(bearer(&jane.token))
                .set_json(body)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Invalid service type");
    }

    #[actix_web::test]
    async fn stats_are_admin_only_and_sum_prices() {
        let backend = TestBackend::new();
        let (jane, pet) = with_pet(&backend, "jane@example.com").await;
        let admin = backend.register_admin("admin@example.com").await;
        let app = test::init_service(backend.app()).await;

        for price in [10.0, 30.0] {
            let response = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/services/book")
                    .insert_header(bearer(&jane.token))
                    .set_json(taxi(&pet, price))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let forbidden = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/services/stats")
                .insert_header(bearer(&jane.token))
                .to_request(),
        )
        .await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/services/stats")
                .insert_header(bearer(&admin.token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let stats: Value = test::read_body_json(response).await;
        assert_eq!(stats["overall"]["totalBookings"], 2);
        assert_eq!(stats["overall"]["totalRevenue"], 40.0);
        assert_eq!(stats["overall"]["averagePrice"], 20.0);
        assert_eq!(stats["byService"][0]["serviceType"], "Pet Taxi");
        assert_eq!(stats["byService"][0]["count"], 2);
    }

    #[actix_web::test]
    async fn deleting_a_booking_reports_removal() {
        let backend = TestBackend::new();
        let (jane, pet) = with_pet(&backend, "jane@example.com").await;
        let app = test::init_service(backend.app()).await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/services/book")
                .insert_header(bearer(&jane.token))
                .set_json(taxi(&pet, 12.0))
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(created).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/services/{id}"))
                .insert_header(bearer(&jane.token))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "Booking removed");
    }
}
