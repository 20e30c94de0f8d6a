//! Lifecycle hooks around mutating repository operations.

use crate::db::params::SqlParam;
use crate::error::DbResult;
use async_trait::async_trait;

/// Callbacks invoked before and after each mutating operation.
///
/// Every method defaults to a no-op; implementors override only the stages
/// they care about. A failing before-hook aborts the operation before any
/// statement executes. A failing after-hook is reported to the caller even
/// though the statement already ran; there is no transaction boundary at
/// this layer, so hooks must be safe to fail without requiring rollback.
#[async_trait]
pub trait RepoHooks<T: Send + Sync>: Send + Sync {
    async fn before_insert(&self, _entity: &T) -> DbResult<()> {
        Ok(())
    }

    async fn after_insert(&self, _entity: &T) -> DbResult<()> {
        Ok(())
    }

    async fn before_update(&self, _entity: &T) -> DbResult<()> {
        Ok(())
    }

    async fn after_update(&self, _entity: &T) -> DbResult<()> {
        Ok(())
    }

    async fn before_delete(&self, _id: &SqlParam) -> DbResult<()> {
        Ok(())
    }

    async fn after_delete(&self, _id: &SqlParam) -> DbResult<()> {
        Ok(())
    }
}
