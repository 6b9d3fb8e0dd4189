//! Health reporting over the user store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::domain::ports::{HealthQuery, UserRepository};

/// Reachability of a backing dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    /// The dependency answered.
    Healthy,
    /// The dependency failed or timed out.
    Unhealthy,
}

/// Body of the `/health` endpoint.
///
/// `status` describes the process itself and is always `"ok"` while it can
/// answer at all; store trouble only shows up in `database`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    status: &'static str,
    database: DependencyStatus,
}

impl HealthReport {
    /// Report for a running process with the given store status.
    pub fn new(database: DependencyStatus) -> Self {
        Self {
            status: "ok",
            database,
        }
    }

    /// Process status.
    pub fn status(&self) -> &'static str {
        self.status
    }

    /// Store status.
    pub fn database(&self) -> DependencyStatus {
        self.database
    }
}

/// Health service implementing [`HealthQuery`] by pinging the repository.
#[derive(Clone)]
pub struct HealthService<R> {
    repo: Arc<R>,
}

impl<R> HealthService<R> {
    /// Service probing `repo` on every check.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> HealthQuery for HealthService<R>
where
    R: UserRepository,
{
    async fn check(&self) -> HealthReport {
        match self.repo.ping().await {
            Ok(()) => HealthReport::new(DependencyStatus::Healthy),
            Err(error) => {
                warn!(%error, "database health probe failed");
                HealthReport::new(DependencyStatus::Unhealthy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use rstest::rstest;

    #[rstest]
    #[case(Ok(()), DependencyStatus::Healthy)]
    #[case(Err(UserPersistenceError::connection("refused")), DependencyStatus::Unhealthy)]
    #[case(Err(UserPersistenceError::timeout("elapsed")), DependencyStatus::Unhealthy)]
    #[tokio::test]
    async fn check_reflects_ping_outcome(
        #[case] ping: Result<(), UserPersistenceError>,
        #[case] expected: DependencyStatus,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_ping().times(1).return_once(move || ping);

        let report = HealthService::new(Arc::new(repo)).check().await;
        assert_eq!(report.status(), "ok");
        assert_eq!(report.database(), expected);
    }

    #[rstest]
    fn report_serialises_lowercase_status() {
        let value = serde_json::to_value(HealthReport::new(DependencyStatus::Unhealthy))
            .expect("serialise report");
        assert_eq!(
            value,
            serde_json::json!({"status": "ok", "database": "unhealthy"})
        );
    }
}
