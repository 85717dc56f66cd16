//! Admin-only user management under `/api/auth/users`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::AccountUpdate;
use crate::domain::{Error, UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::{MessageResponse, RegisterRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID, parse_id};

/// Registration fields plus the admin flag.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub account: RegisterRequest,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl From<AdminUpdateUserRequest> for AccountUpdate {
    fn from(value: AdminUpdateUserRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            password: value.password.map(Zeroizing::new),
            is_admin: value.is_admin,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/users",
    responses(
        (status = 200, description = "All users", body = [UserProfile]),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/auth/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let users = state.user_admin.list_users(session.caller()).await?;
    Ok(web::Json(users))
}

#[utoipa::path(
    post,
    path = "/api/auth/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/auth/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest { account, is_admin } = payload.into_inner();
    let profile = state
        .user_admin
        .create_user(session.caller(), account.into_input(is_admin))
        .await?;
    Ok(HttpResponse::Created().json(profile))
}

#[utoipa::path(
    get,
    path = "/api/auth/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserProfile),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/auth/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let id: UserId = parse_id(&path, ID)?;
    let profile = state.user_admin.get_user(session.caller(), &id).await?;
    Ok(web::Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/auth/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/auth/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AdminUpdateUserRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let id: UserId = parse_id(&path, ID)?;
    let profile = state
        .user_admin
        .update_user(session.caller(), &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

#[utoipa::path(
    delete,
    path = "/api/auth/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User removed", body = MessageResponse),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/auth/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: UserId = parse_id(&path, ID)?;
    state.user_admin.delete_user(session.caller(), &id).await?;
    Ok(web::Json(MessageResponse::new("User removed")))
}
