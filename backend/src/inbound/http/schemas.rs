//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Server-assigned identifier.
    #[schema(example = 1, minimum = 1)]
    id: i64,
    #[schema(example = "Ann")]
    name: String,
    #[schema(example = "ann@example.com")]
    email: String,
    /// RFC 3339 creation time.
    #[schema(value_type = String, format = DateTime, example = "2025-01-01T00:00:00Z")]
    created_at: String,
    /// RFC 3339 time of the last mutation.
    #[schema(value_type = String, format = DateTime, example = "2025-01-01T00:00:00Z")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::DependencyStatus`].
#[derive(ToSchema)]
#[schema(as = DependencyStatus)]
pub enum DependencyStatusSchema {
    #[schema(rename = "healthy")]
    Healthy,
    #[schema(rename = "unhealthy")]
    Unhealthy,
}

/// OpenAPI schema for [`crate::domain::HealthReport`].
#[derive(ToSchema)]
#[schema(as = HealthReport)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct HealthReportSchema {
    /// Always `ok` while the process can answer.
    #[schema(example = "ok")]
    status: String,
    database: DependencyStatusSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn schemas_use_domain_names() {
        assert_eq!(UserSchema::name(), "User");
        assert_eq!(HealthReportSchema::name(), "HealthReport");
        assert_eq!(DependencyStatusSchema::name(), "DependencyStatus");
    }
}
