//! User account API handlers.
//!
//! ```text
//! POST  /api/user/create {"email":"cook@example.com","password":"pass123","name":"Cook"}
//! POST  /api/user/token  {"email":"cook@example.com","password":"pass123"}
//! GET   /api/user/me
//! PATCH /api/user/me     {"name":"Head Cook"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ProfileChanges, RegisterUserRequest};
use crate::domain::{ApiResult, EmailAddress, LoginCredentials, PersonName, PlainPassword, User};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_error, password_error, require, user_field_error,
};

/// Sign-up body for `POST /api/user/create`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    #[schema(example = "pass123")]
    pub password: Option<String>,
    #[schema(example = "Cook")]
    pub name: Option<String>,
}

/// Credentials body for `POST /api/user/token`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update body for `PATCH /api/user/me`; omitted fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account. The password is never returned.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "Cook")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            name: user.name().as_ref().to_owned(),
        }
    }
}

/// Issued API token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

fn parse_name(raw: &str) -> ApiResult<PersonName> {
    PersonName::new(raw).map_err(|err| user_field_error(FieldName::new("name"), &err))
}

fn parse_password(raw: &str) -> ApiResult<PlainPassword> {
    PlainPassword::new(raw).map_err(|err| password_error(&err))
}

impl TryFrom<CreateUserRequest> for RegisterUserRequest {
    type Error = crate::domain::Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, FieldName::new("email"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Ok(Self {
            email: EmailAddress::new(&email)
                .map_err(|err| user_field_error(FieldName::new("email"), &err))?,
            password: parse_password(&password)?,
            name: parse_name(value.name.as_deref().unwrap_or_default())?,
        })
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/user/create",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request or email taken", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "createUser",
    security([])
)]
#[post("/user/create")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = RegisterUserRequest::try_from(payload.into_inner())?;
    let user = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for an API token.
///
/// Issuing a token replaces any token previously issued to the account.
#[utoipa::path(
    post,
    path = "/api/user/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing or wrong credentials", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "createToken",
    security([])
)]
#[post("/user/token")]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let TokenRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(|err| login_error(&err))?;
    let token = state.accounts.issue_token(credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

/// Current account profile.
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "getProfile"
)]
#[get("/user/me")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let profile = state.accounts_query.fetch_profile(user.id()).await?;
    Ok(web::Json(UserResponse::from(&profile)))
}

/// Update the current account's name and/or password.
#[utoipa::path(
    patch,
    path = "/api/user/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "updateProfile"
)]
#[patch("/user/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let UpdateProfileRequest { name, password } = payload.into_inner();
    let changes = ProfileChanges {
        name: name.as_deref().map(parse_name).transpose()?,
        password: password.as_deref().map(parse_password).transpose()?,
    };
    let updated = state.accounts.update_profile(user.id(), changes).await?;
    Ok(web::Json(UserResponse::from(&updated)))
}
