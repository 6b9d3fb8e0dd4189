//! Domain primitives, services and ports.
//!
//! Purpose: define the user entity and its invariants, the transport-agnostic
//! error taxonomy, and the services that implement the driving ports. Nothing
//! in here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload and its closed category set.
//! - TraceId: request-scoped correlation identifier.
//! - User, UserId, NewUser, UserChanges: the user aggregate and its drafts.
//! - UserService, HealthService: driving port implementations.

pub mod error;
pub mod health;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::health::{DependencyStatus, HealthReport, HealthService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, User, UserChanges, UserDraft, UserId, UserValidationError};
pub use self::user_service::UserService;
