//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Every statement runs under a per-statement timeout. Identifiers come from
//! the `BIGSERIAL` sequence; timestamps come from the injected clock.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Statement timeout used when none is configured.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    statement_timeout: Duration,
}

impl DieselUserRepository {
    /// Create a repository over `pool`, stamping rows with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Override the per-statement timeout.
    #[must_use]
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Await `statement`, failing with [`UserPersistenceError::Timeout`] once
    /// the configured timeout elapses. Dropping the future cancels the query.
    async fn bounded<T, F>(&self, statement: F) -> Result<T, UserPersistenceError>
    where
        F: Future<Output = QueryResult<T>>,
    {
        match tokio::time::timeout(self.statement_timeout, statement).await {
            Ok(result) => result.map_err(map_diesel_error),
            Err(_) => {
                warn!(
                    timeout_ms = self.statement_timeout.as_millis(),
                    "user statement timed out"
                );
                Err(UserPersistenceError::timeout(format!(
                    "statement exceeded {}ms",
                    self.statement_timeout.as_millis()
                )))
            }
        }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection closed")
        }
        DieselError::BrokenTransactionManager => {
            UserPersistenceError::connection("database connection unusable")
        }
        DieselError::DatabaseError(_, info) => UserPersistenceError::query(info.message()),
        other => UserPersistenceError::query(other.to_string()),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = row.id;
    User::try_from(row).map_err(|err| {
        warn!(id, error = %err, "stored user violates domain invariants");
        UserPersistenceError::query(format!("invalid user row {id}: {err}"))
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();
        let new_row = NewUserRow {
            name: user.name(),
            email: user.email(),
            created_at: now,
            updated_at: now,
        };

        let row = self
            .bounded(
                diesel::insert_into(users::table)
                    .values(&new_row)
                    .returning(UserRow::as_returning())
                    .get_result(&mut conn),
            )
            .await?;
        row_to_user(row)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = self
            .bounded(async {
                users::table
                    .find(id.get())
                    .select(UserRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
            })
            .await?
            .ok_or_else(|| UserPersistenceError::not_found(*id))?;
        row_to_user(row)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = self
            .bounded(
                users::table
                    .order(users::id.desc())
                    .select(UserRow::as_select())
                    .load(&mut conn),
            )
            .await?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            name: user.name(),
            email: user.email(),
            updated_at: user.next_updated_at(self.clock.utc()),
        };

        let row = self
            .bounded(async {
                diesel::update(users::table.find(user.id().get()))
                    .set(&changes)
                    .returning(UserRow::as_returning())
                    .get_result(&mut conn)
                    .await
                    .optional()
            })
            .await?
            .ok_or_else(|| UserPersistenceError::not_found(user.id()))?;
        row_to_user(row)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = self
            .bounded(diesel::delete(users::table.find(id.get())).execute(&mut conn))
            .await?;
        if affected == 0 {
            return Err(UserPersistenceError::not_found(*id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        self.bounded(diesel::sql_query("SELECT 1").execute(&mut conn))
            .await
            .map(|_| ())
    }
}
