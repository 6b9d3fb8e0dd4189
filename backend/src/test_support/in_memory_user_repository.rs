//! In-memory [`UserRepository`] used by HTTP and behaviour tests.
//!
//! Mirrors the Diesel adapter's observable behaviour: sequential ids starting
//! at 1, newest-first listing, clock-stamped timestamps that never move
//! backwards, and `NotFound` for missing rows. It can also be switched into
//! an "unavailable" mode to simulate a lost database.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserDraft, UserId};

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    rows: BTreeMap<UserId, User>,
    unavailable: bool,
}

/// Thread-safe in-memory user store.
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            clock,
        }
    }

    /// Make every call fail with a connection error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn available(&self) -> Result<MutexGuard<'_, Store>, UserPersistenceError> {
        let store = self.lock();
        if store.unavailable {
            return Err(UserPersistenceError::connection("in-memory store offline"));
        }
        Ok(store)
    }
}

fn invalid_row(err: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::query(format!("invalid user row: {err}"))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut store = self.available()?;
        let now = self.clock.utc();
        let id = store.last_id + 1;
        let created = User::new(UserDraft {
            id,
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            created_at: now,
            updated_at: now,
        })
        .map_err(invalid_row)?;
        store.last_id = id;
        store.rows.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        self.available()?
            .rows
            .get(id)
            .cloned()
            .ok_or_else(|| UserPersistenceError::not_found(*id))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.available()?.rows.values().rev().cloned().collect())
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut store = self.available()?;
        let now = self.clock.utc();
        let stored = store
            .rows
            .get_mut(&user.id())
            .ok_or_else(|| UserPersistenceError::not_found(user.id()))?;
        let updated = User::new(UserDraft {
            id: user.id().get(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            created_at: stored.created_at(),
            updated_at: stored.next_updated_at(now),
        })
        .map_err(invalid_row)?;
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        self.available()?
            .rows
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserPersistenceError::not_found(*id))
    }

    async fn ping(&self) -> Result<(), UserPersistenceError> {
        self.available().map(|_| ())
    }
}
