//! Port abstraction for user persistence adapters and their errors.
//!
//! The repository owns identifier and timestamp assignment. Callers hand it
//! validated drafts or merged entities and receive the persisted row back.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No row matched the identifier.
        NotFound { id: UserId } => "user {id} not found",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Statement did not complete within the configured timeout.
        Timeout { message: String } => "user repository timed out: {message}",
    }
}

/// Driven port for user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new row, stamping both timestamps with the current time.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<User, UserPersistenceError>;

    /// Every user, newest identifier first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite name and email for `user.id()` and refresh `updated_at`.
    ///
    /// The stored `updated_at` never moves backwards, even if the clock does.
    async fn update(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Remove the row permanently.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;

    /// Cheap round trip to the store.
    async fn ping(&self) -> Result<(), UserPersistenceError>;
}
