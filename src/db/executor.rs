//! The execution interface.
//!
//! `Database` is the capability contract between the repository and a
//! concrete SQL client: running statements, fetching rows, and verifying
//! liveness. Any implementation is substitutable; this is the seam used for
//! test doubles.
//!
//! Establishing a session is the concrete client's constructor
//! ([`SqlClient::connect`](crate::db::client::SqlClient::connect)); a
//! `Database` value is always connected.

use crate::db::params::SqlParam;
use crate::db::row::Row;
use crate::error::{DbError, DbResult};
use async_trait::async_trait;

#[async_trait]
pub trait Database: Send + Sync {
    /// Release the session. Double-close must not corrupt state.
    async fn close(&self) -> DbResult<()>;

    /// Verify liveness without mutating state.
    async fn ping(&self) -> DbResult<()>;

    /// Execute a statement and return every result row.
    async fn query(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<Row>>;

    /// Execute a statement and return its first row, if any.
    async fn query_row(&self, sql: &str, params: &[SqlParam]) -> DbResult<Option<Row>>;

    /// Execute a statement with no row-shaped result; returns the
    /// affected-row count.
    async fn exec(&self, sql: &str, params: &[SqlParam]) -> DbResult<u64>;

    /// Fetch all result rows. An empty result is valid, not an error.
    async fn select(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<Row>> {
        self.query(sql, params).await
    }

    /// Fetch exactly one row; zero rows is a not-found error.
    async fn get(&self, sql: &str, params: &[SqlParam]) -> DbResult<Row> {
        self.query_row(sql, params)
            .await?
            .ok_or_else(|| DbError::not_found(sql.to_string()))
    }

    /// Execute an INSERT statement, surfacing only success or failure.
    async fn insert(&self, sql: &str, params: &[SqlParam]) -> DbResult<()> {
        self.exec(sql, params).await.map(|_| ())
    }

    /// Execute an UPDATE statement, surfacing only success or failure.
    async fn update(&self, sql: &str, params: &[SqlParam]) -> DbResult<()> {
        self.exec(sql, params).await.map(|_| ())
    }

    /// Execute a DELETE statement, surfacing only success or failure.
    async fn delete(&self, sql: &str, params: &[SqlParam]) -> DbResult<()> {
        self.exec(sql, params).await.map(|_| ())
    }
}
