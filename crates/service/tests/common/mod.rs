//! # Common Test Utilities
//!
//! Shared test infrastructure: an in-memory SQLite database with the full
//! migrations applied, plus fixture constructors.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Once,
};

use chrono::Utc;
use entity::{crews, users};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DbConn, Set};
use service::AppState;
use uuid::Uuid;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Global atomic counter to ensure uniqueness across all test runs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Initialize the test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Application state over a fresh in-memory SQLite database.
///
/// A single pooled connection keeps the in-memory database alive and
/// shared across tasks.
pub async fn test_state() -> AppState {
    init_test_env();

    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);

    let db: DbConn = Database::connect(options)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    AppState::with_defaults(db)
}

/// Unique name for test fixtures
pub fn unique_name(prefix: &str) -> String {
    let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("test-{prefix}-{counter}")
}

/// Create a test user
pub async fn create_test_user(db: &DbConn, prefix: &str) -> users::Model {
    let name = unique_name(prefix);
    users::ActiveModel {
        id:         Set(Uuid::new_v4()),
        email:      Set(format!("{name}@example.com")),
        nickname:   Set(name),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create test user")
}

/// Create a test crew with no members
pub async fn create_test_crew(db: &DbConn, prefix: &str) -> crews::Model {
    crews::ActiveModel {
        id:               Set(Uuid::new_v4()),
        crew_name:        Set(unique_name(prefix)),
        crew_description: Set("Test crew".to_string()),
        member_count:     Set(0),
        crew_image:       Set(None),
        created_at:       Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to create test crew")
}
