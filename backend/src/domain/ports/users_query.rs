//! Driving port for user reads.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Domain use-case port for fetching users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one user by raw identifier.
    async fn get_user(&self, id: i64) -> Result<User, Error>;

    /// Every user, newest first.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
