//! Handle behavior before initialization and failure caching.
//!
//! Runs in its own test binary so the process never sees a successful
//! initialization.

use dbrepo::config::ConnectionSettings;
use dbrepo::db::{self, Driver};
use dbrepo::error::DbError;

#[tokio::test]
async fn test_uninitialized_and_cached_failure() {
    // Getter before any initialization.
    let err = db::get_instance().unwrap_err();
    assert!(matches!(err, DbError::NotInitialized));

    // Close with no handle is a no-op.
    db::close().await.unwrap();

    // Oracle resolves in the registry but has no backing client, so the
    // first initialization fails.
    let oracle = ConnectionSettings::new(Driver::Oracle, "", "system", "XE", "", 1521);
    let first_err = db::init_instance(oracle).await.unwrap_err();
    assert!(matches!(first_err, DbError::UnsupportedDriver { .. }));

    // The failure is cached and replayed; a later call with valid settings
    // does not retry.
    let sqlite = ConnectionSettings::new(Driver::Sqlite, "", "", "sqlite::memory:", "", 0);
    let second_err = db::init_instance(sqlite).await.unwrap_err();
    assert_eq!(first_err.to_string(), second_err.to_string());

    // The getter replays the same cached outcome.
    let get_err = db::get_instance().unwrap_err();
    assert_eq!(first_err.to_string(), get_err.to_string());

    // Close remains a no-op with a failed handle.
    db::close().await.unwrap();
}
