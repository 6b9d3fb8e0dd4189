//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Async repository calls run on a runtime owned by the test context so the
//! embedded database can be dropped outside any Tokio runtime.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use users_api::domain::ports::{UserPersistenceError, UserRepository};
use users_api::domain::{NewUser, UserChanges, UserId};
use users_api::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use users_api::test_support::MutableClock;

mod support;

use support::embedded_postgres::{drop_users_table, lock_users_table, provision_migrated_database};
use support::handle_cluster_setup_failure;

const START: i64 = 1_700_000_000;

struct TestContext {
    runtime: Runtime,
    repository: DieselUserRepository,
    clock: Arc<MutableClock>,
    database_url: String,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn run<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    fn create(&self, name: &str, email: &str) -> users_api::domain::User {
        let new_user = NewUser::new(name, email).expect("valid new user");
        self.run(self.repository.create(&new_user))
            .expect("create succeeds")
    }
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_migrated_database()?;
    let database_url = database.url().to_string();

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let clock = Arc::new(MutableClock::at_epoch_seconds(START));
    let repository = DieselUserRepository::new(pool, clock.clone());

    Ok(TestContext {
        runtime,
        repository,
        clock,
        database_url,
        _database: database,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    match setup_test_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn id(raw: i64) -> UserId {
    UserId::new(raw).expect("positive id")
}

#[rstest]
fn create_assigns_identity_and_timestamps(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let user = ctx.create("Ann", "ann@example.com");

    assert!(user.id().get() > 0);
    assert_eq!(user.name(), "Ann");
    assert_eq!(user.email(), "ann@example.com");
    assert_eq!(user.created_at().timestamp(), START);
    assert_eq!(user.created_at(), user.updated_at());

    let fetched = ctx
        .run(ctx.repository.find_by_id(&user.id()))
        .expect("find succeeds");
    assert_eq!(fetched, user);
}

#[rstest]
fn created_ids_increase(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let first = ctx.create("Ann", "ann@example.com");
    let second = ctx.create("Bob", "bob@example.com");

    assert!(second.id() > first.id());
}

#[rstest]
fn list_returns_newest_first(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    assert!(ctx.run(ctx.repository.list()).expect("list").is_empty());

    let ann = ctx.create("Ann", "ann@example.com");
    let bob = ctx.create("Bob", "bob@example.com");

    let listed = ctx.run(ctx.repository.list()).expect("list succeeds");
    assert_eq!(listed, vec![bob, ann]);
}

#[rstest]
fn find_missing_user_reports_not_found(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let result = ctx.run(ctx.repository.find_by_id(&id(999)));
    assert_eq!(result, Err(UserPersistenceError::not_found(id(999))));
}

#[rstest]
fn update_overwrites_fields_and_advances_updated_at(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let user = ctx.create("Ann", "ann@example.com");
    ctx.clock.advance_seconds(60);
    let changed = UserChanges::new(Some("Annie".into()), None).apply_to(user.clone());

    let updated = ctx
        .run(ctx.repository.update(&changed))
        .expect("update succeeds");

    assert_eq!(updated.id(), user.id());
    assert_eq!(updated.name(), "Annie");
    assert_eq!(updated.email(), "ann@example.com");
    assert_eq!(updated.created_at(), user.created_at());
    assert_eq!(updated.updated_at().timestamp(), START + 60);
}

#[rstest]
fn update_never_moves_updated_at_backwards(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let user = ctx.create("Ann", "ann@example.com");
    ctx.clock.advance_seconds(-3_600);

    let updated = ctx
        .run(ctx.repository.update(&user))
        .expect("update succeeds");
    assert_eq!(updated.updated_at(), user.updated_at());
}

#[rstest]
fn update_missing_user_reports_not_found(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let user = ctx.create("Ann", "ann@example.com");
    ctx.run(ctx.repository.delete(&user.id()))
        .expect("delete succeeds");

    let result = ctx.run(ctx.repository.update(&user));
    assert_eq!(result, Err(UserPersistenceError::not_found(user.id())));
}

#[rstest]
fn delete_removes_user_once(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let user = ctx.create("Ann", "ann@example.com");
    ctx.run(ctx.repository.delete(&user.id()))
        .expect("delete succeeds");

    assert_eq!(
        ctx.run(ctx.repository.find_by_id(&user.id())),
        Err(UserPersistenceError::not_found(user.id()))
    );
    assert_eq!(
        ctx.run(ctx.repository.delete(&user.id())),
        Err(UserPersistenceError::not_found(user.id()))
    );
}

#[rstest]
fn ping_succeeds_against_live_database(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.run(ctx.repository.ping()).expect("ping succeeds");
}

#[rstest]
fn missing_schema_reports_query_error(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    drop_users_table(&ctx.database_url).expect("drop succeeds");

    let result = ctx.run(ctx.repository.list());
    assert!(
        matches!(result, Err(UserPersistenceError::Query { .. })),
        "expected query error, got {result:?}"
    );
}

#[rstest]
fn blocked_statement_reports_timeout(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    ctx.create("Ann", "ann@example.com");
    let lock = lock_users_table(&ctx.database_url).expect("lock acquired");

    let repository = ctx
        .repository
        .clone()
        .with_statement_timeout(Duration::from_millis(200));
    let result = ctx.run(repository.list());
    drop(lock);

    assert!(
        matches!(result, Err(UserPersistenceError::Timeout { .. })),
        "expected timeout, got {result:?}"
    );
}

#[rstest]
fn statement_within_budget_completes(context: Option<TestContext>) {
    let Some(ctx) = context else { return };

    let ann = ctx.create("Ann", "ann@example.com");
    let repository = ctx
        .repository
        .clone()
        .with_statement_timeout(Duration::from_secs(5));

    assert_eq!(ctx.run(repository.list()).expect("list succeeds"), vec![ann]);
}
