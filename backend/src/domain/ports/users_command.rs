//! Driving port for user mutations.
//!
//! Identifiers arrive as raw integers straight from the transport; the
//! implementation decides whether they are valid.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Input for creating a user. Empty strings are rejected by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Input for a partial update. `None` or empty leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Domain use-case port for creating, updating and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate and persist a new user.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    /// Apply a partial update and return the persisted result.
    async fn update_user(&self, id: i64, request: UpdateUserRequest) -> Result<User, Error>;

    /// Delete a user.
    async fn delete_user(&self, id: i64) -> Result<(), Error>;
}
