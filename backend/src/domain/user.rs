//! User data model.
//!
//! A [`User`] is only ever built from validated parts: a positive
//! [`UserId`] assigned by persistence, non-empty name and email, and
//! timestamps where `created_at <= updated_at`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was zero or negative.
    NonPositiveId,
    /// Name was empty or whitespace only.
    EmptyName,
    /// Email was empty or whitespace only.
    EmptyEmail,
    /// `updated_at` precedes `created_at`.
    TimestampsOutOfOrder,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "invalid user ID"),
            Self::EmptyName => write!(f, "name is required"),
            Self::EmptyEmail => write!(f, "email is required"),
            Self::TimestampsOutOfOrder => {
                write!(f, "updated_at must not precede created_at")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Server-assigned user identifier; always positive.
///
/// ```
/// use users_api::domain::UserId;
///
/// assert_eq!(UserId::new(7).map(UserId::get), Ok(7));
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate a raw identifier.
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated input for creating a user. Carries no id or timestamps; those
/// are assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    /// Validate name and email; name is checked first.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        if is_blank(&name) {
            return Err(UserValidationError::EmptyName);
        }
        if is_blank(&email) {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self { name, email })
    }

    /// Requested name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested email.
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Raw parts of a persisted user, validated by [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application user.
///
/// Serialises as `{id, name, email, created_at, updated_at}` with RFC 3339
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a user from persisted parts, enforcing every invariant.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            name,
            email,
            created_at,
            updated_at,
        } = draft;
        let id = UserId::new(id)?;
        let NewUser { name, email } = NewUser::new(name, email)?;
        if updated_at < created_at {
            return Err(UserValidationError::TimestampsOutOfOrder);
        }
        Ok(Self {
            id,
            name,
            email,
            created_at,
            updated_at,
        })
    }

    /// Persist-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Timestamp a mutation at `now` would record.
    ///
    /// Never earlier than the current `updated_at`, so a clock step backwards
    /// cannot break `created_at <= updated_at`.
    pub fn next_updated_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.updated_at)
    }

    /// Return a copy stamped with [`User::next_updated_at`].
    #[must_use]
    pub fn touched(mut self, now: DateTime<Utc>) -> Self {
        self.updated_at = self.next_updated_at(now);
        self
    }
}

/// Partial update policy: only supplied, non-empty fields overwrite.
///
/// ```
/// use users_api::domain::UserChanges;
///
/// let changes = UserChanges::new(Some("Annie".into()), Some(String::new()));
/// assert_eq!(changes.name(), Some("Annie"));
/// assert_eq!(changes.email(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    name: Option<String>,
    email: Option<String>,
}

impl UserChanges {
    /// Normalise the optional fields; empty values mean "no change".
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self {
            name: name.filter(|value| !is_blank(value)),
            email: email.filter(|value| !is_blank(value)),
        }
    }

    /// Replacement name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replacement email, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Merge into `user`. Identifier and timestamps are left alone.
    pub fn apply_to(self, mut user: User) -> User {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        user
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: i64,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::new(UserDraft {
            id: value.id,
            name: value.name,
            email: value.email,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}
