//! Process-wide handle lifecycle.
//!
//! The one-time initialization guard is process state, so the whole
//! lifecycle runs in a single test function.

use dbrepo::config::ConnectionSettings;
use dbrepo::db::{self, Database, Driver};

#[tokio::test]
async fn test_instance_lifecycle() {
    let first = ConnectionSettings::new(Driver::Sqlite, "", "first", "sqlite::memory:", "", 0);
    let second = ConnectionSettings::new(Driver::Sqlite, "", "second", "sqlite::memory:", "", 0);

    // Concurrent first calls: exactly one connect happens; both callers
    // observe the same handle.
    let (a, b) = tokio::join!(
        db::init_instance(first.clone()),
        db::init_instance(second.clone())
    );
    let a = a.unwrap();
    let b = b.unwrap();
    assert!(std::ptr::eq(a, b));

    // One caller's settings won; the other's were ignored.
    let winner = a.settings().user.clone();
    assert!(winner == "first" || winner == "second");

    // A later call with different arguments still returns the same handle.
    let third = ConnectionSettings::new(Driver::Sqlite, "", "third", "sqlite::memory:", "", 0);
    let c = db::init_instance(third).await.unwrap();
    assert!(std::ptr::eq(a, c));
    assert_eq!(c.settings().user, winner);

    // The getter returns the initialized handle.
    let got = db::get_instance().unwrap();
    assert!(std::ptr::eq(a, got));

    // The handle is usable.
    let database = got.database();
    database.ping().await.unwrap();
    database
        .exec("CREATE TABLE marker (id INTEGER PRIMARY KEY)", &[])
        .await
        .unwrap();

    // Explicit teardown releases the session.
    db::close().await.unwrap();
}
