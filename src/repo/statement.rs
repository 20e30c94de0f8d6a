//! Statement synthesis.
//!
//! `StatementBuilder` renders CRUD statement text from a declarative
//! configuration: table, ordered field list, join fragments, ordering clause,
//! row limit, placeholder style. Field order determines bind-value order;
//! placeholder generation is purely positional.

use crate::db::driver::Placeholder;

/// Declarative statement configuration for one entity's table.
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    table: String,
    fields: Vec<String>,
    joins: Vec<String>,
    order: Option<String>,
    limit: u32,
    placeholder: Placeholder,
}

impl StatementBuilder {
    /// Create a builder for the given table and qualified field list.
    pub fn new(table: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            table: table.into(),
            fields,
            joins: Vec::new(),
            order: None,
            limit: 0,
            placeholder: Placeholder::Question,
        }
    }

    /// Set the placeholder style.
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Append join-clause fragments, concatenated in order after the table.
    pub fn with_joins(mut self, joins: Vec<String>) -> Self {
        self.joins = joins;
        self
    }

    /// Set the ordering clause, rendered verbatim (e.g. `ORDER BY id`).
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Set the row limit; 0 means unlimited.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Number of configured fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The primary table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// `SELECT <fields> FROM <table> <joins> <order> <limit>`
    pub fn select(&self) -> String {
        let mut sql = self.select_from();
        self.push_order(&mut sql);
        self.push_limit(&mut sql);
        sql
    }

    /// Same as [`select`](Self::select) with the caller's predicate inserted
    /// verbatim between joins and ordering. Only bind values are
    /// parameterized; the predicate text itself is the caller's
    /// responsibility.
    pub fn select_where(&self, predicate: &str) -> String {
        let mut sql = self.select_from();
        sql.push_str(" WHERE ");
        sql.push_str(predicate);
        self.push_order(&mut sql);
        self.push_limit(&mut sql);
        sql
    }

    /// `SELECT <fields> FROM <table> <joins> WHERE <table>.id = <ph>`
    ///
    /// Qualifying the predicate with the primary table assumes no join alias
    /// exposes a clashing `<table>.id` column.
    pub fn select_by_id(&self) -> String {
        let mut sql = self.select_from();
        sql.push_str(" WHERE ");
        sql.push_str(&self.table);
        sql.push_str(".id = ");
        sql.push_str(&self.placeholder.render(1));
        sql
    }

    /// `INSERT INTO <table> (<fields>) VALUES (<placeholders>)`, one
    /// placeholder per field in list order.
    pub fn insert(&self) -> String {
        let placeholders: Vec<String> = (1..=self.fields.len())
            .map(|i| self.placeholder.render(i))
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.fields.join(", "),
            placeholders.join(", ")
        )
    }

    /// `UPDATE <table> SET <field = ph, ...> WHERE id = <ph>`; the id
    /// placeholder comes last, after one per field.
    pub fn update(&self) -> String {
        let assignments: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{} = {}", field, self.placeholder.render(i + 1)))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = {}",
            self.table,
            assignments.join(", "),
            self.placeholder.render(self.fields.len() + 1)
        )
    }

    /// `DELETE FROM <table> WHERE id = <ph>`
    pub fn delete(&self) -> String {
        format!(
            "DELETE FROM {} WHERE id = {}",
            self.table,
            self.placeholder.render(1)
        )
    }

    fn select_from(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.fields.join(", "), self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        sql
    }

    fn push_order(&self, sql: &mut String) {
        if let Some(order) = &self.order {
            sql.push(' ');
            sql.push_str(order);
        }
    }

    fn push_limit(&self, sql: &mut String) {
        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }
    }
}
