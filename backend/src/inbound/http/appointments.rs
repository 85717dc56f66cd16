//! Appointment handlers under `/api/appointments`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Appointment, AppointmentDetails, AppointmentId, AppointmentInput, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::MessageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID, parse_id};

/// Appointment body for create and update. Date is `YYYY-MM-DD`, time `HH:MM`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub pet: Option<String>,
    #[schema(example = "Checkup")]
    pub service: Option<String>,
    #[schema(example = "2025-06-01")]
    pub date: Option<String>,
    #[schema(example = "10:00")]
    pub time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl From<AppointmentRequest> for AppointmentInput {
    fn from(value: AppointmentRequest) -> Self {
        Self {
            pet: value.pet,
            service: value.service,
            date: value.date,
            time: value.time,
            notes: value.notes,
            status: value.status,
        }
    }
}

/// Body for the status endpoints shared by appointments, bookings and orders.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StatusRequest {
    pub status: Option<String>,
}

impl StatusRequest {
    pub(crate) fn into_status(self) -> String {
        self.status.unwrap_or_default()
    }
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "Appointments by date and time", body = [AppointmentDetails]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AppointmentDetails>>> {
    let appointments = state.appointments_query.list(session.caller()).await?;
    Ok(web::Json(appointments))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = AppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Invalid request or slot taken", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "createAppointment"
)]
#[post("/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let appointment = state
        .appointments
        .create(session.caller(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(appointment))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDetails),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentDetails>> {
    let id: AppointmentId = parse_id(&path, ID)?;
    let appointment = state.appointments_query.get(session.caller(), &id).await?;
    Ok(web::Json(appointment))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment identifier")),
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 400, description = "Invalid request or slot taken", body = Error),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointment"
)]
#[put("/appointments/{id}")]
pub async fn update_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AppointmentRequest>,
) -> ApiResult<web::Json<Appointment>> {
    let id: AppointmentId = parse_id(&path, ID)?;
    let appointment = state
        .appointments
        .update(session.caller(), &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(appointment))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    params(("id" = String, Path, description = "Appointment identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Appointment),
        (status = 400, description = "Invalid status", body = Error),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointmentStatus"
)]
#[put("/appointments/{id}/status")]
pub async fn update_appointment_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<Appointment>> {
    let id: AppointmentId = parse_id(&path, ID)?;
    let appointment = state
        .appointments
        .update_status(session.caller(), &id, payload.into_inner().into_status())
        .await?;
    Ok(web::Json(appointment))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "deleteAppointment"
)]
#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: AppointmentId = parse_id(&path, ID)?;
    state.appointments.delete(session.caller(), &id).await?;
    Ok(web::Json(MessageResponse::new(
        "Appointment deleted successfully",
    )))
}
