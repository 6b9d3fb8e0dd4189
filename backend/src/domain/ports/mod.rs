//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`UserRepository`]) are implemented by outbound adapters.
//! Driving ports ([`UsersCommand`], [`UsersQuery`], [`HealthQuery`]) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod health_query;
mod user_repository;
mod users_command;
mod users_query;

pub use health_query::HealthQuery;
#[cfg(test)]
pub use health_query::MockHealthQuery;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{CreateUserRequest, UpdateUserRequest, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
