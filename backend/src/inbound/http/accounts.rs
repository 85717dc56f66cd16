//! Account handlers: registration, login, self-service profile and pets.
//!
//! ```text
//! POST /api/auth/register {"firstName":"Jane","lastName":"Doe","email":"jane@example.com","password":"hunter22"}
//! POST /api/auth/login {"email":"jane@example.com","password":"hunter22"}
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{AccountUpdate, AuthenticatedAccount};
use crate::domain::{
    Error, LoginCredentials, PetChanges, PetDraft, PetId, RegistrationInput, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PET_ID, parse_id};

/// Registration body. Fields are optional on the wire so missing values
/// produce the domain's validation message rather than a parse error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl RegisterRequest {
    pub(crate) fn into_input(self, is_admin: bool) -> RegistrationInput {
        RegistrationInput {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password: Zeroizing::new(self.password.unwrap_or_default()),
            phone: self.phone,
            address: self.address,
            is_admin,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial profile update; empty strings leave a field unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for AccountUpdate {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            password: value.password.map(Zeroizing::new),
            is_admin: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
}

impl From<PetRequest> for PetChanges {
    fn from(value: PetRequest) -> Self {
        Self {
            name: value.name,
            kind: value.kind,
            breed: value.breed,
            age: value.age,
        }
    }
}

/// Profile plus a freshly issued bearer token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

impl From<AuthenticatedAccount> for AuthResponse {
    fn from(value: AuthenticatedAccount) -> Self {
        Self {
            token: value.token.expose().to_owned(),
            profile: value.profile,
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let account = state
        .accounts
        .register(payload.into_inner().into_input(false))
        .await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(account)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Missing fields", body = Error),
        (status = 401, description = "Invalid email or password", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )?;
    let account = state.accounts.login(credentials).await?;
    Ok(web::Json(account.into()))
}

/// The caller's own profile, pets included.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.accounts_query.me(session.caller()).await?;
    Ok(web::Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/auth/update",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = AuthResponse),
        (status = 400, description = "Invalid request or email taken", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateProfile"
)]
#[put("/auth/update")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let account = state
        .accounts
        .update_profile(session.caller(), payload.into_inner().into())
        .await?;
    Ok(web::Json(account.into()))
}

#[utoipa::path(
    delete,
    path = "/api/auth/delete",
    responses(
        (status = 200, description = "Account removed", body = MessageResponse),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "deleteAccount"
)]
#[delete("/auth/delete")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MessageResponse>> {
    state.accounts.delete_account(session.caller()).await?;
    Ok(web::Json(MessageResponse::new("User removed")))
}

#[utoipa::path(
    post,
    path = "/api/auth/pets",
    request_body = PetRequest,
    responses(
        (status = 201, description = "Pet added", body = UserProfile),
        (status = 400, description = "Pet name and type are required", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "addPet"
)]
#[post("/auth/pets")]
pub async fn add_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PetRequest>,
) -> ApiResult<HttpResponse> {
    let PetRequest {
        name,
        kind,
        breed,
        age,
    } = payload.into_inner();
    let draft = PetDraft::try_new(
        name.as_deref().unwrap_or_default(),
        kind.as_deref().unwrap_or_default(),
        breed,
        age,
    )?;
    let profile = state.accounts.add_pet(session.caller(), draft).await?;
    Ok(HttpResponse::Created().json(profile))
}

#[utoipa::path(
    put,
    path = "/api/auth/pets/{pet_id}",
    params(("pet_id" = String, Path, description = "Pet identifier")),
    request_body = PetRequest,
    responses(
        (status = 200, description = "Pet updated", body = UserProfile),
        (status = 404, description = "Pet not found", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updatePet"
)]
#[put("/auth/pets/{pet_id}")]
pub async fn update_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PetRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let pet_id: PetId = parse_id(&path, PET_ID)?;
    let profile = state
        .accounts
        .update_pet(session.caller(), &pet_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

#[utoipa::path(
    delete,
    path = "/api/auth/pets/{pet_id}",
    params(("pet_id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet removed", body = UserProfile),
        (status = 404, description = "Pet not found", body = Error)
    ),
    tags = ["auth"],
    operation_id = "deletePet"
)]
#[delete("/auth/pets/{pet_id}")]
pub async fn delete_pet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let pet_id: PetId = parse_id(&path, PET_ID)?;
    let profile = state.accounts.delete_pet(session.caller(), &pet_id).await?;
    Ok(web::Json(profile))
}
