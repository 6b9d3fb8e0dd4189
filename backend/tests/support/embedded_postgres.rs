//! Embedded PostgreSQL helpers for integration tests.
//!
//! Each test gets its own temporary database on a cluster shared by the test
//! binary, cloned from a template migrated with the same embedded migrations
//! the service runs at startup.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use users_api::outbound::persistence::run_pending_migrations_blocking;
use uuid::Uuid;

use super::format_postgres_error;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const TEMPLATE_NAME_PREFIX: &str = "users_api_template";

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Return the process-wide embedded cluster, retrying transient bootstrap
/// failures.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt < SHARED_CLUSTER_RETRIES => {
                eprintln!(
                    "pg-embed: bootstrap attempt {attempt}/{SHARED_CLUSTER_RETRIES} failed: {error:?}"
                );
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(format!("{error:?}")),
        }
    }
}

/// Keep the superuser password stable across test binaries that reuse the
/// same data directory.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "users_api_embedded_test");
        }
    }
}

fn template_database_name() -> Result<String, String> {
    let migrations_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations_dir).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the migrated template database once per schema revision.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations_blocking(&url)
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(template_name)
}

/// Create a fresh, migrated database cloned from the template.
pub fn provision_migrated_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster()?;
    let template_name = ensure_template_database(cluster)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| format!("create database from template: {err:?}"))
}

/// Drop the `users` table to simulate schema loss.
/// Open a transaction holding an `ACCESS EXCLUSIVE` lock on `users`.
///
/// Statements touching the table block until the returned client is dropped.
pub fn lock_users_table(url: &str) -> Result<Client, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("BEGIN; LOCK TABLE users IN ACCESS EXCLUSIVE MODE;")
        .map_err(|err| format_postgres_error(&err))?;
    Ok(client)
}

pub fn drop_users_table(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("DROP TABLE IF EXISTS users;")
        .map_err(|err| format_postgres_error(&err))
}
