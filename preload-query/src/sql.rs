//! The abstract query handed to the executor.
//!
//! [`SelectQuery`] is a description, not a connection: the engine builds one
//! per loader invocation (and one per root batch window) and hands it to the
//! [`QueryExecutor`](crate::executor::QueryExecutor). `to_sql` renders the
//! exact text recorded in the query log.

use smol_str::SmolStr;

use crate::filter::Filter;
use crate::pagination::Pagination;
use crate::types::{OrderBy, Select};

/// A single relational SELECT over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Table the query reads from.
    pub table: SmolStr,
    /// Column projection.
    pub select: Select,
    /// Row predicate.
    pub filter: Filter,
    /// Result ordering.
    pub order_by: OrderBy,
    /// Limit/offset window.
    pub pagination: Pagination,
}

impl SelectQuery {
    /// Create a query selecting all columns of a table.
    pub fn table(table: impl Into<SmolStr>) -> Self {
        Self {
            table: table.into(),
            select: Select::All,
            filter: Filter::None,
            order_by: OrderBy::none(),
            pagination: Pagination::new(),
        }
    }

    /// Add a filter condition (AND-combined with any existing filter).
    pub fn r#where(mut self, filter: Filter) -> Self {
        self.filter = self.filter.and_then(filter);
        self
    }

    /// Set the column projection.
    pub fn select(mut self, select: Select) -> Self {
        self.select = select;
        self
    }

    /// Set the ordering.
    pub fn order_by(mut self, order: impl Into<OrderBy>) -> Self {
        self.order_by = order.into();
        self
    }

    /// Skip a number of records.
    pub fn skip(mut self, n: u64) -> Self {
        self.pagination = self.pagination.skip(n);
        self
    }

    /// Take a limited number of records.
    pub fn take(mut self, n: u64) -> Self {
        self.pagination = self.pagination.take(n);
        self
    }

    /// Render the query as SQL text, with inline literals.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        sql.push_str("SELECT ");
        sql.push_str(&self.select.to_sql());
        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        if !self.filter.is_none() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filter.to_sql());
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.to_sql());
        }

        let pagination_sql = self.pagination.to_sql();
        if !pagination_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&pagination_sql);
        }

        sql
    }
}
