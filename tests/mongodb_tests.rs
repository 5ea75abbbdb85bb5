//! Integration tests for the MongoDB storage backend using the storage test harness.
//!
//! Invokes `data_service_tests!` to validate that `MongoDataService`
//! fully conforms to the `DataService<Invoice>` contract.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a MongoDB container)
//! - Feature flag `mongodb_backend` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features mongodb_backend --test mongodb_tests
//! ```
//!
//! # Test isolation
//!
//! All tests share a single MongoDB container (via `OnceLock`). Each test
//! gets its own database.

#![cfg(feature = "mongodb_backend")]

#[macro_use]
mod storage_harness;

use invoice_desk::entities::Invoice;
use invoice_desk::storage::MongoDataService;
use invoice_desk::storage::mongodb::connect;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use storage_harness::*;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh database per test)
// ---------------------------------------------------------------------------

/// Holds the testcontainer handle (keeps it alive) and the connection URL.
struct MongoTestEnv {
    /// Container handle - dropping this stops the MongoDB container.
    _container: testcontainers::ContainerAsync<Mongo>,
    /// Connection URL for creating per-test clients.
    connection_url: String,
}

/// Global test environment, initialized once per test binary.
static TEST_ENV: OnceCell<MongoTestEnv> = OnceCell::const_new();

/// Initialize the shared MongoDB container (if not already started).
async fn init_mongo_env() -> &'static MongoTestEnv {
    TEST_ENV
        .get_or_init(|| async {
            let container = Mongo::default()
                .start()
                .await
                .expect("Failed to start MongoDB container - is Docker running?");

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(27017).await.unwrap();

            MongoTestEnv {
                connection_url: format!("mongodb://{}:{}", host, port),
                _container: container,
            }
        })
        .await
}

/// Atomic counter to generate unique database names per test.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Run id so reruns against a long-lived container never collide.
static RUN_ID: OnceLock<u32> = OnceLock::new();

/// Create a fresh `MongoDataService` backed by a database no other test uses.
async fn clean_mongo_data_service() -> MongoDataService<Invoice> {
    let env = init_mongo_env().await;
    let run = RUN_ID.get_or_init(std::process::id);
    let db_num = DB_COUNTER.fetch_add(1, Ordering::SeqCst);

    let db = connect(&env.connection_url, &format!("invoice_desk_test_{}_{}", run, db_num))
        .await
        .expect("Failed to connect to MongoDB");
    MongoDataService::new(db)
}

// ---------------------------------------------------------------------------
// Test suites via macros
// ---------------------------------------------------------------------------

data_service_tests!(clean_mongo_data_service().await);
