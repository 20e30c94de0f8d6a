//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Driver registry (backend ids, connection formats, placeholder styles)
//! - Process-wide connection management
//! - The execution interface and its sqlx-backed client
//! - Bind parameters and backend-neutral row decoding

pub mod client;
pub mod driver;
pub mod executor;
pub mod handle;
pub mod params;
pub mod row;

pub use client::{DbPool, SqlClient};
pub use driver::{Driver, Placeholder};
pub use executor::Database;
pub use handle::{DbHandle, build_connection_string, close, get_instance, init_instance};
pub use params::SqlParam;
pub use row::{Row, decode_row};
