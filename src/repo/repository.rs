//! The generic repository.
//!
//! `Repository<T>` synthesizes CRUD statements from its declarative
//! configuration and delegates execution to the shared [`Database`] handle.
//! Entity-specific behavior is injected through three collaborator
//! functions: a row-scan function, a bind-values extractor, and an identity
//! extractor.

use crate::db::driver::Placeholder;
use crate::db::executor::Database;
use crate::db::handle::DbHandle;
use crate::db::params::SqlParam;
use crate::db::row::Row;
use crate::error::{DbError, DbResult};
use crate::repo::hooks::RepoHooks;
use crate::repo::statement::StatementBuilder;
use std::sync::Arc;
use tracing::debug;

/// Maps a decoded row into an entity. [`decode_row`](crate::db::row::decode_row)
/// works here for any `Deserialize` entity.
pub type ScanFn<T> = fn(&Row) -> DbResult<T>;

/// Extracts an entity's persisted values, in configured field order.
pub type ValuesFn<T> = fn(&T) -> Vec<SqlParam>;

/// Extracts an entity's identity value.
pub type IdFn<T> = fn(&T) -> SqlParam;

/// A repository bound to one entity type and one table.
pub struct Repository<T: Send + Sync> {
    db: Arc<dyn Database>,
    statement: StatementBuilder,
    scan: ScanFn<T>,
    values: Option<ValuesFn<T>>,
    id_value: Option<IdFn<T>>,
    hooks: Option<Box<dyn RepoHooks<T>>>,
}

impl<T: Send + Sync> Repository<T> {
    /// Create a repository over the given execution interface.
    ///
    /// `fields` must list qualified column names in the same order the
    /// values extractor returns bind values, since placeholder generation is
    /// positional.
    pub fn new(
        db: Arc<dyn Database>,
        table: impl Into<String>,
        fields: Vec<String>,
        scan: ScanFn<T>,
    ) -> Self {
        Self {
            db,
            statement: StatementBuilder::new(table, fields),
            scan,
            values: None,
            id_value: None,
            hooks: None,
        }
    }

    /// Create a repository bound to the process-wide handle, with the
    /// placeholder style matching the handle's driver.
    pub fn for_handle(
        handle: &DbHandle,
        table: impl Into<String>,
        fields: Vec<String>,
        scan: ScanFn<T>,
    ) -> Self {
        Self::new(handle.database(), table, fields, scan)
            .with_placeholder(handle.driver().placeholder())
    }

    /// Set the placeholder style rendered into statements.
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.statement = self.statement.with_placeholder(placeholder);
        self
    }

    /// Set join-clause fragments, inserted after the table name in order.
    pub fn with_joins(mut self, joins: Vec<String>) -> Self {
        self.statement = self.statement.with_joins(joins);
        self
    }

    /// Set the ordering clause, rendered verbatim (e.g. `ORDER BY id`).
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.statement = self.statement.with_order(order);
        self
    }

    /// Set the row limit for list operations; 0 means unlimited.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.statement = self.statement.with_limit(limit);
        self
    }

    /// Set the bind-values extractor required by insert and update.
    pub fn with_values(mut self, values: ValuesFn<T>) -> Self {
        self.values = Some(values);
        self
    }

    /// Set the identity extractor required by update.
    pub fn with_id_value(mut self, id_value: IdFn<T>) -> Self {
        self.id_value = Some(id_value);
        self
    }

    /// Attach lifecycle hooks around mutating operations.
    pub fn with_hooks(mut self, hooks: Box<dyn RepoHooks<T>>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Fetch the entity with the given identity value.
    ///
    /// Returns a not-found error when no row matches, never a zero-valued
    /// entity.
    pub async fn find_by_id(&self, id: impl Into<SqlParam>) -> DbResult<T> {
        let sql = self.statement.select_by_id();
        debug!(sql = %sql, "find_by_id");
        let row = self.db.get(&sql, &[id.into()]).await?;
        (self.scan)(&row)
    }

    /// Fetch every entity, honoring the configured ordering and limit.
    ///
    /// An empty table yields an empty collection, not an error.
    pub async fn find_all(&self) -> DbResult<Vec<T>> {
        let sql = self.statement.select();
        debug!(sql = %sql, "find_all");
        let rows = self.db.select(&sql, &[]).await?;
        rows.iter().map(|row| (self.scan)(row)).collect()
    }

    /// Fetch entities matching a caller-supplied predicate.
    ///
    /// The predicate text is inserted verbatim: write placeholders into it
    /// and pass their bind values via `params`; only those are
    /// parameterized.
    pub async fn find(&self, predicate: &str, params: &[SqlParam]) -> DbResult<Vec<T>> {
        let sql = self.statement.select_where(predicate);
        debug!(sql = %sql, "find");
        let rows = self.db.select(&sql, params).await?;
        rows.iter().map(|row| (self.scan)(row)).collect()
    }

    /// Insert an entity.
    pub async fn insert(&self, entity: &T) -> DbResult<()> {
        if let Some(hooks) = &self.hooks {
            hooks.before_insert(entity).await?;
        }

        let values = self.extract_values(entity)?;
        let sql = self.statement.insert();
        debug!(sql = %sql, "insert");
        self.db.insert(&sql, &values).await?;

        if let Some(hooks) = &self.hooks {
            hooks.after_insert(entity).await?;
        }
        Ok(())
    }

    /// Update the entity identified by its identity value.
    pub async fn update(&self, entity: &T) -> DbResult<()> {
        if let Some(hooks) = &self.hooks {
            hooks.before_update(entity).await?;
        }

        let id_value = self.id_value.ok_or_else(|| {
            DbError::configuration("update requires an identity extractor (with_id_value)")
        })?;
        let mut values = self.extract_values(entity)?;
        values.push(id_value(entity));
        let sql = self.statement.update();
        debug!(sql = %sql, "update");
        self.db.update(&sql, &values).await?;

        if let Some(hooks) = &self.hooks {
            hooks.after_update(entity).await?;
        }
        Ok(())
    }

    /// Delete the entity with the given identity value.
    pub async fn delete(&self, id: impl Into<SqlParam>) -> DbResult<()> {
        let id = id.into();
        if let Some(hooks) = &self.hooks {
            hooks.before_delete(&id).await?;
        }

        let sql = self.statement.delete();
        debug!(sql = %sql, "delete");
        self.db.delete(&sql, std::slice::from_ref(&id)).await?;

        if let Some(hooks) = &self.hooks {
            hooks.after_delete(&id).await?;
        }
        Ok(())
    }

    fn extract_values(&self, entity: &T) -> DbResult<Vec<SqlParam>> {
        let values_fn = self.values.ok_or_else(|| {
            DbError::configuration("mutation requires a values extractor (with_values)")
        })?;
        let values = values_fn(entity);
        if values.len() != self.statement.field_count() {
            return Err(DbError::configuration(format!(
                "values extractor returned {} values for {} configured fields on {}",
                values.len(),
                self.statement.field_count(),
                self.statement.table()
            )));
        }
        Ok(values)
    }
}
