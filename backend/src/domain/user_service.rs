//! User domain service.
//!
//! Implements the [`UsersCommand`] and [`UsersQuery`] driving ports on top of
//! a [`UserRepository`]. Validation lives here; the repository only ever sees
//! well-formed drafts and merged entities.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::domain::ports::{
    CreateUserRequest, UpdateUserRequest, UserPersistenceError, UserRepository, UsersCommand,
    UsersQuery,
};
use crate::domain::{Error, NewUser, User, UserChanges, UserId};

const USER_NOT_FOUND: &str = "user not found";
const STORE_UNAVAILABLE: &str = "user store unavailable";

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn parse_id(id: i64) -> Result<UserId, Error> {
        UserId::new(id).map_err(|err| Error::invalid_request(err.to_string()))
    }

    fn map_persistence_error(error: UserPersistenceError, operation: &str) -> Error {
        match error {
            UserPersistenceError::NotFound { .. } => Error::not_found(USER_NOT_FOUND),
            UserPersistenceError::Connection { .. } | UserPersistenceError::Timeout { .. } => {
                warn!(%error, operation, "user store unavailable");
                Error::service_unavailable(STORE_UNAVAILABLE)
            }
            UserPersistenceError::Query { .. } => {
                error!(%error, operation, "user store query failed");
                Error::internal(error.to_string()).context(format!("failed to {operation}"))
            }
        }
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let CreateUserRequest { name, email } = request;
        let draft =
            NewUser::new(name, email).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.repo
            .create(&draft)
            .await
            .map_err(|err| Self::map_persistence_error(err, "create user"))
    }

    async fn update_user(&self, id: i64, request: UpdateUserRequest) -> Result<User, Error> {
        let id = Self::parse_id(id)?;
        let current = self
            .repo
            .find_by_id(&id)
            .await
            .map_err(|err| Self::map_persistence_error(err, "load user"))?;
        let merged = UserChanges::new(request.name, request.email).apply_to(current);
        self.repo
            .update(&merged)
            .await
            .map_err(|err| Self::map_persistence_error(err, "update user"))
    }

    async fn delete_user(&self, id: i64) -> Result<(), Error> {
        let id = Self::parse_id(id)?;
        self.repo
            .delete(&id)
            .await
            .map_err(|err| Self::map_persistence_error(err, "delete user"))
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn get_user(&self, id: i64) -> Result<User, Error> {
        let id = Self::parse_id(id)?;
        self.repo
            .find_by_id(&id)
            .await
            .map_err(|err| Self::map_persistence_error(err, "load user"))
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repo
            .list()
            .await
            .map_err(|err| Self::map_persistence_error(err, "list users"))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
