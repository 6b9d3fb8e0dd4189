//! Driving port for the dependency health report.

use async_trait::async_trait;

use crate::domain::HealthReport;

/// Reports process and store status. Never fails; an unreachable store is
/// reported in the body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthQuery: Send + Sync {
    /// Probe dependencies and summarise the result.
    async fn check(&self) -> HealthReport;
}
