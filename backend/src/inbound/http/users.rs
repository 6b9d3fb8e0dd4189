//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users       {"name":"Ann","email":"ann@example.com"}
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}  {"name":"Annie"}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Handlers only decode, delegate and encode. Validation happens in the
//! service behind [`HttpState`].

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;
use crate::domain::ports::{CreateUserRequest, UpdateUserRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::UserSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_json_body, parse_user_id};

/// Body of `POST /api/v1/users`.
///
/// Missing fields decode as empty strings so the service reports which one
/// is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateUserPayload {
    #[schema(example = "Ann")]
    pub name: String,
    #[schema(example = "ann@example.com")]
    pub email: String,
}

impl From<CreateUserPayload> for CreateUserRequest {
    fn from(value: CreateUserPayload) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

/// Body of `PUT /api/v1/users/{id}`. Absent or empty fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserPayload {
    #[schema(example = "Annie")]
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserPayload> for UpdateUserRequest {
    fn from(value: UpdateUserPayload) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserPayload>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create_user(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List every user, newest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 500, description = "Internal server error", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid user ID", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    let user = state.users_query.get_user(id).await?;
    Ok(web::Json(user))
}

/// Partially update a user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path)?;
    let payload: UpdateUserPayload = parse_json_body(&body)?;
    let user = state.users.update_user(id, payload.into()).await?;
    Ok(web::Json(user))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid user ID", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    state.users.delete_user(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
