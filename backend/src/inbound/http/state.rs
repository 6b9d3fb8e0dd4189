//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only depend on domain
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{HealthQuery, UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Mutating user operations.
    pub users: Arc<dyn UsersCommand>,
    /// Read-only user operations.
    pub users_query: Arc<dyn UsersQuery>,
    /// Dependency health check.
    pub health: Arc<dyn HealthQuery>,
}

impl HttpState {
    /// Bundle the ports handed to every handler.
    pub fn new(
        users: Arc<dyn UsersCommand>,
        users_query: Arc<dyn UsersQuery>,
        health: Arc<dyn HealthQuery>,
    ) -> Self {
        Self {
            users,
            users_query,
            health,
        }
    }
}
