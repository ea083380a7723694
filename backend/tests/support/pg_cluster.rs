//! Embedded PostgreSQL databases for the Diesel adapter suites.
//!
//! Every suite in a process shares one cluster. Each test gets a fresh
//! database cloned from a template that already carries the migrations, so
//! tests never see each other's rows.
//!
//! Setting `SKIP_TEST_CLUSTER=1` turns a cluster that cannot start into a
//! skipped test instead of a failure.

use std::future::Future;
use std::sync::{Mutex, OnceLock};

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

const TEMPLATE_NAME: &str = "recipes_template";

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// A migrated database with a pool and the runtime that drives it.
pub struct PgContext {
    /// Tokio runtime reused for every async call in a test.
    runtime: Runtime,
    pool: DbPool,
    _database: TemporaryDatabase,
}

impl PgContext {
    /// Pool connected to this test's database.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Drive `future` to completion on the context runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[expect(
    clippy::print_stderr,
    reason = "skipped suites leave a marker in the test output"
)]
fn handle_cluster_setup_failure<T>(reason: &str) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn ensure_template(cluster: &ClusterHandle, runtime: &Runtime) -> Result<(), String> {
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(TEMPLATE_NAME)
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(TEMPLATE_NAME)
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(TEMPLATE_NAME);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn setup() -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    ensure_template(cluster, &runtime)?;

    let name = format!("test_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database_from_template(name.as_str(), TEMPLATE_NAME)
        .map_err(|err| format!("create database: {err:?}"))?;
    let config = PoolConfig::new(database.url()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        runtime,
        pool,
        _database: database,
    })
}

/// Provision a fresh database for one test.
///
/// Returns `None` when the cluster is unavailable and `SKIP_TEST_CLUSTER`
/// is set.
///
/// # Panics
///
/// Panics when the cluster is unavailable and skipping is not enabled.
pub fn pg_context() -> Option<PgContext> {
    match setup() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(&reason),
    }
}
