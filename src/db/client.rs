//! Concrete SQL client backed by sqlx.
//!
//! `SqlClient` implements the [`Database`] execution interface over
//! database-specific pools (PgPool, MySqlPool, SqlitePool) to ensure full
//! type support.
//!
//! # Architecture
//!
//! Statement execution uses database-specific implementations organized in
//! submodules (`mysql`, `postgres`, `sqlite`). Each submodule provides
//! identical functionality adapted to the database's type system; the code
//! structure is intentionally parallel to make differences obvious.

use crate::db::driver::Driver;
use crate::db::executor::Database;
use crate::db::params::SqlParam;
use crate::db::row::Row;
use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use sqlx::{
    Connection, MySqlPool, PgPool, SqlitePool, mysql::MySqlConnectOptions,
    mysql::MySqlPoolOptions, postgres::PgPoolOptions, sqlite::SqliteConnectOptions,
    sqlite::SqlitePoolOptions,
};
use std::str::FromStr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Default per-statement timeout in seconds.
pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 30;

/// Database-specific connection pool (avoids AnyPool limitations).
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Get the backend driver for this pool.
    pub fn driver(&self) -> Driver {
        match self {
            DbPool::Postgres(_) => Driver::Postgres,
            DbPool::MySql(_) => Driver::MySql,
            DbPool::Sqlite(_) => Driver::Sqlite,
        }
    }
}

/// The sqlx-backed execution interface implementation.
#[derive(Debug, Clone)]
pub struct SqlClient {
    pool: DbPool,
    statement_timeout: Duration,
}

impl SqlClient {
    /// Establish a session against the backend selected by `driver_id`.
    ///
    /// Fails with a connection error on a malformed connection string or an
    /// unreachable backend, and with an unsupported-driver error for
    /// identifiers with no backing client (including "oracle").
    pub async fn connect(driver_id: &str, conn_str: &str) -> DbResult<Self> {
        let pool = match driver_id {
            "postgres" => {
                let pool = PgPoolOptions::new().connect(conn_str).await.map_err(|e| {
                    DbError::connection(format!("failed to connect to PostgreSQL: {}", e))
                })?;
                DbPool::Postgres(pool)
            }
            "mysql" => {
                let options = MySqlConnectOptions::from_str(conn_str)
                    .map_err(|e| {
                        DbError::connection(format!("invalid MySQL connection string: {}", e))
                    })?
                    .charset("utf8mb4");
                let pool = MySqlPoolOptions::new()
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        DbError::connection(format!("failed to connect to MySQL: {}", e))
                    })?;
                DbPool::MySql(pool)
            }
            "sqlite3" => {
                let options = SqliteConnectOptions::from_str(conn_str)
                    .map_err(|e| {
                        DbError::connection(format!("invalid SQLite connection string: {}", e))
                    })?
                    .create_if_missing(true);
                // One connection: in-memory databases exist per connection,
                // and the layer publishes a single logical session.
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await
                    .map_err(|e| {
                        DbError::connection(format!("failed to connect to SQLite: {}", e))
                    })?;
                DbPool::Sqlite(pool)
            }
            other => return Err(DbError::unsupported_driver(other)),
        };

        info!(driver = driver_id, "Connected to database");
        Ok(Self {
            pool,
            statement_timeout: Duration::from_secs(DEFAULT_STATEMENT_TIMEOUT_SECS),
        })
    }

    /// Override the per-statement timeout.
    pub fn with_statement_timeout(mut self, statement_timeout: Duration) -> Self {
        self.statement_timeout = statement_timeout;
        self
    }

    /// Get the backend driver this client is connected to.
    pub fn driver(&self) -> Driver {
        self.pool.driver()
    }
}

#[async_trait]
impl Database for SqlClient {
    async fn close(&self) -> DbResult<()> {
        match &self.pool {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::MySql(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
        info!(driver = self.driver().driver_id(), "Closed database session");
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        match &self.pool {
            DbPool::Postgres(pool) => {
                let mut conn = pool.acquire().await.map_err(DbError::from)?;
                conn.ping().await.map_err(DbError::from)
            }
            DbPool::MySql(pool) => {
                let mut conn = pool.acquire().await.map_err(DbError::from)?;
                conn.ping().await.map_err(DbError::from)
            }
            DbPool::Sqlite(pool) => {
                let mut conn = pool.acquire().await.map_err(DbError::from)?;
                conn.ping().await.map_err(DbError::from)
            }
        }
    }

    async fn query(&self, sql: &str, params: &[SqlParam]) -> DbResult<Vec<Row>> {
        debug!(sql = %sql, params = params.len(), "Executing query");
        match &self.pool {
            DbPool::Postgres(p) => postgres::fetch_rows(p, sql, params, self.statement_timeout).await,
            DbPool::MySql(p) => mysql::fetch_rows(p, sql, params, self.statement_timeout).await,
            DbPool::Sqlite(p) => sqlite::fetch_rows(p, sql, params, self.statement_timeout).await,
        }
    }

    async fn query_row(&self, sql: &str, params: &[SqlParam]) -> DbResult<Option<Row>> {
        debug!(sql = %sql, params = params.len(), "Executing single-row query");
        match &self.pool {
            DbPool::Postgres(p) => postgres::fetch_row(p, sql, params, self.statement_timeout).await,
            DbPool::MySql(p) => mysql::fetch_row(p, sql, params, self.statement_timeout).await,
            DbPool::Sqlite(p) => sqlite::fetch_row(p, sql, params, self.statement_timeout).await,
        }
    }

    async fn exec(&self, sql: &str, params: &[SqlParam]) -> DbResult<u64> {
        debug!(sql = %sql, params = params.len(), "Executing statement");
        match &self.pool {
            DbPool::Postgres(p) => postgres::execute(p, sql, params, self.statement_timeout).await,
            DbPool::MySql(p) => mysql::execute(p, sql, params, self.statement_timeout).await,
            DbPool::Sqlite(p) => sqlite::execute(p, sql, params, self.statement_timeout).await,
        }
    }
}

fn timeout_error(operation: &str, elapsed: Duration) -> DbError {
    DbError::timeout(operation, elapsed.as_secs() as u32)
}

mod postgres {
    use super::*;
    use crate::db::params::bind_postgres_param;
    use crate::db::row::ToRow;

    pub async fn fetch_rows(
        pool: &PgPool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_postgres_param(query, param);
        }
        match timeout(statement_timeout, query.fetch_all(pool)).await {
            Ok(Ok(rows)) => Ok(rows.iter().map(ToRow::to_row).collect()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", statement_timeout)),
        }
    }

    pub async fn fetch_row(
        pool: &PgPool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<Option<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_postgres_param(query, param);
        }
        match timeout(statement_timeout, query.fetch_optional(pool)).await {
            Ok(Ok(row)) => Ok(row.map(|r| r.to_row())),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", statement_timeout)),
        }
    }

    pub async fn execute(
        pool: &PgPool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<u64> {
        // When params is empty, execute raw SQL directly; some statements
        // do not support being prepared.
        let result = if params.is_empty() {
            use sqlx::Executor;
            timeout(statement_timeout, pool.execute(sql)).await
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_postgres_param(query, param);
            }
            timeout(statement_timeout, query.execute(pool)).await
        };

        match result {
            Ok(Ok(r)) => Ok(r.rows_affected()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("statement execution", statement_timeout)),
        }
    }
}

mod mysql {
    use super::*;
    use crate::db::params::bind_mysql_param;
    use crate::db::row::ToRow;

    pub async fn fetch_rows(
        pool: &MySqlPool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_mysql_param(query, param);
        }
        match timeout(statement_timeout, query.fetch_all(pool)).await {
            Ok(Ok(rows)) => Ok(rows.iter().map(ToRow::to_row).collect()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", statement_timeout)),
        }
    }

    pub async fn fetch_row(
        pool: &MySqlPool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<Option<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_mysql_param(query, param);
        }
        match timeout(statement_timeout, query.fetch_optional(pool)).await {
            Ok(Ok(row)) => Ok(row.map(|r| r.to_row())),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", statement_timeout)),
        }
    }

    pub async fn execute(
        pool: &MySqlPool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<u64> {
        let result = if params.is_empty() {
            use sqlx::Executor;
            timeout(statement_timeout, pool.execute(sql)).await
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_mysql_param(query, param);
            }
            timeout(statement_timeout, query.execute(pool)).await
        };

        match result {
            Ok(Ok(r)) => Ok(r.rows_affected()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("statement execution", statement_timeout)),
        }
    }
}

mod sqlite {
    use super::*;
    use crate::db::params::bind_sqlite_param;
    use crate::db::row::ToRow;

    pub async fn fetch_rows(
        pool: &SqlitePool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_sqlite_param(query, param);
        }
        match timeout(statement_timeout, query.fetch_all(pool)).await {
            Ok(Ok(rows)) => Ok(rows.iter().map(ToRow::to_row).collect()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", statement_timeout)),
        }
    }

    pub async fn fetch_row(
        pool: &SqlitePool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<Option<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_sqlite_param(query, param);
        }
        match timeout(statement_timeout, query.fetch_optional(pool)).await {
            Ok(Ok(row)) => Ok(row.map(|r| r.to_row())),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("query execution", statement_timeout)),
        }
    }

    pub async fn execute(
        pool: &SqlitePool,
        sql: &str,
        params: &[SqlParam],
        statement_timeout: Duration,
    ) -> DbResult<u64> {
        let result = if params.is_empty() {
            use sqlx::Executor;
            timeout(statement_timeout, pool.execute(sql)).await
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_sqlite_param(query, param);
            }
            timeout(statement_timeout, query.execute(pool)).await
        };

        match result {
            Ok(Ok(r)) => Ok(r.rows_affected()),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(timeout_error("statement execution", statement_timeout)),
        }
    }
}
