//! Driver registry.
//!
//! Maps each supported backend engine to the identifier string consumed by
//! the SQL client, its connection-string template, and its positional
//! placeholder style.

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};

/// Supported backend database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Postgres,
    /// Includes MariaDB
    MySql,
    Sqlite,
    Oracle,
}

/// Positional placeholder style rendered into statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` for every bind position (MySQL, SQLite, Oracle).
    Question,
    /// `$1, $2, ...` (Postgres).
    Dollar,
}

impl Placeholder {
    /// Render the placeholder for a 1-based bind position.
    pub fn render(&self, index: usize) -> String {
        match self {
            Placeholder::Dollar => format!("${index}"),
            Placeholder::Question => "?".to_string(),
        }
    }
}

impl Driver {
    /// The identifier string consumed by [`SqlClient::connect`].
    ///
    /// [`SqlClient::connect`]: crate::db::client::SqlClient::connect
    pub fn driver_id(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite3",
            Self::Oracle => "oracle",
        }
    }

    /// The connection-string template for this backend.
    ///
    /// Postgres composes a key=value DSN; the remaining backends take the
    /// configured database name verbatim (a file path for SQLite, a full
    /// URL for MySQL).
    pub fn connection_format(&self) -> &'static str {
        match self {
            Self::Postgres => "host={} user={} dbname={} password={} sslmode=disable",
            Self::MySql | Self::Sqlite | Self::Oracle => "{}",
        }
    }

    /// The placeholder style statements use against this backend.
    pub fn placeholder(&self) -> Placeholder {
        match self {
            Self::Postgres => Placeholder::Dollar,
            Self::MySql | Self::Sqlite | Self::Oracle => Placeholder::Question,
        }
    }

    /// Get the display name for this driver.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
            Self::Oracle => "Oracle",
        }
    }

    /// Get the default port for this backend.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::Postgres => Some(5432),
            Self::MySql => Some(3306),
            Self::Oracle => Some(1521),
            Self::Sqlite => None,
        }
    }

    /// Parse a driver from its configured name.
    ///
    /// Unrecognized names fail with an unsupported-driver error rather than
    /// falling back to a default.
    pub fn from_name(name: &str) -> DbResult<Self> {
        match name.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "oracle" => Ok(Self::Oracle),
            other => Err(DbError::unsupported_driver(other)),
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_ids_are_non_empty() {
        for driver in [
            Driver::Postgres,
            Driver::MySql,
            Driver::Sqlite,
            Driver::Oracle,
        ] {
            assert!(!driver.driver_id().is_empty());
        }
    }

    #[test]
    fn test_driver_id_values() {
        assert_eq!(Driver::Postgres.driver_id(), "postgres");
        assert_eq!(Driver::MySql.driver_id(), "mysql");
        assert_eq!(Driver::Sqlite.driver_id(), "sqlite3");
        assert_eq!(Driver::Oracle.driver_id(), "oracle");
    }

    #[test]
    fn test_connection_format() {
        assert_eq!(
            Driver::Postgres.connection_format(),
            "host={} user={} dbname={} password={} sslmode=disable"
        );
        assert_eq!(Driver::Sqlite.connection_format(), "{}");
    }

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(Driver::Postgres.placeholder(), Placeholder::Dollar);
        assert_eq!(Driver::MySql.placeholder(), Placeholder::Question);
        assert_eq!(Driver::Sqlite.placeholder(), Placeholder::Question);
    }

    #[test]
    fn test_placeholder_render() {
        assert_eq!(Placeholder::Dollar.render(1), "$1");
        assert_eq!(Placeholder::Dollar.render(12), "$12");
        assert_eq!(Placeholder::Question.render(1), "?");
        assert_eq!(Placeholder::Question.render(12), "?");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Driver::from_name("postgres").unwrap(), Driver::Postgres);
        assert_eq!(Driver::from_name("PostgreSQL").unwrap(), Driver::Postgres);
        assert_eq!(Driver::from_name("mariadb").unwrap(), Driver::MySql);
        assert_eq!(Driver::from_name("sqlite3").unwrap(), Driver::Sqlite);

        let err = Driver::from_name("mssql").unwrap_err();
        assert!(matches!(err, DbError::UnsupportedDriver { .. }));
        assert!(err.to_string().contains("mssql"));
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(Driver::Postgres.default_port(), Some(5432));
        assert_eq!(Driver::MySql.default_port(), Some(3306));
        assert_eq!(Driver::Sqlite.default_port(), None);
    }
}
