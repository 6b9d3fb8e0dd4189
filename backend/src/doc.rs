//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer and the
//! schema wrappers from [`crate::inbound::http::schemas`], so domain types
//! stay free of utoipa derives. The document backs Swagger UI in debug builds
//! and is printed by the `openapi-dump` binary.

use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::{DependencyStatusSchema, HealthReportSchema, UserSchema};
use crate::inbound::http::users::{CreateUserPayload, UpdateUserPayload};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "CRUD over users backed by PostgreSQL, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ErrorBody,
        CreateUserPayload,
        UpdateUserPayload,
        HealthReportSchema,
        DependencyStatusSchema
    )),
    tags(
        (name = "users", description = "User CRUD"),
        (name = "health", description = "Health checks and orchestration probes")
    )
)]
pub struct ApiDoc;
