//! Connection configuration.
//!
//! This module defines the value object supplied once at process start to
//! [`init_instance`](crate::db::handle::init_instance).

use crate::db::driver::Driver;
use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};

/// Configuration for the process-wide database connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub driver: Driver,
    pub host: String,
    pub user: String,
    pub dbname: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: String,
    pub port: u16,
}

impl ConnectionSettings {
    /// Create new connection settings.
    pub fn new(
        driver: Driver,
        host: impl Into<String>,
        user: impl Into<String>,
        dbname: impl Into<String>,
        password: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            driver,
            host: host.into(),
            user: user.into(),
            dbname: dbname.into(),
            password: password.into(),
            port,
        }
    }

    /// Load settings from `DBREPO_*` environment variables.
    ///
    /// `DBREPO_DRIVER` and `DBREPO_DBNAME` are required; host, user and
    /// password default to empty, port to the driver's default (or 0).
    pub fn from_env() -> DbResult<Self> {
        let driver_name = std::env::var("DBREPO_DRIVER")
            .map_err(|_| DbError::configuration("DBREPO_DRIVER is not set"))?;
        let driver = Driver::from_name(&driver_name)?;

        let dbname = std::env::var("DBREPO_DBNAME")
            .map_err(|_| DbError::configuration("DBREPO_DBNAME is not set"))?;

        let port = match std::env::var("DBREPO_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| DbError::configuration(format!("invalid DBREPO_PORT: {}", raw)))?,
            Err(_) => driver.default_port().unwrap_or(0),
        };

        Ok(Self {
            driver,
            host: std::env::var("DBREPO_HOST").unwrap_or_default(),
            user: std::env::var("DBREPO_USER").unwrap_or_default(),
            dbname,
            password: std::env::var("DBREPO_PASSWORD").unwrap_or_default(),
            port,
        })
    }

    /// Get a display-safe description of these settings (password masked).
    pub fn masked(&self) -> String {
        format!(
            "{}://{}@{}:{}/{} password=****",
            self.driver.driver_id(),
            self.user,
            self.host,
            self.port,
            self.dbname
        )
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("dbname", &self.dbname)
            .field("password", &"****")
            .field("port", &self.port)
            .finish()
    }
}
