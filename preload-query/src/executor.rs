//! The query-executor boundary and the query log.
//!
//! The engine never talks to a database: it builds [`SelectQuery`]
//! descriptions and hands them to a caller-supplied [`QueryExecutor`], once
//! per loader invocation. The executor is synchronous and blocking; retry
//! and backoff for transient store failures are its concern, not the
//! engine's.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::LoadResult;
use crate::row::Row;
use crate::sql::SelectQuery;

/// Runs one relational query to completion and shapes the result into rows.
///
/// Implementations must honor the query's projection override (the optimizer
/// narrows intermediate queries to a few columns) and the single-column
/// `IN` predicate every loader issues.
pub trait QueryExecutor {
    /// Execute a query and return the resulting rows, in result order.
    fn execute(&self, query: &SelectQuery) -> LoadResult<Vec<Row>>;

    /// Execute raw SQL text with all parameters already inlined.
    ///
    /// `shape` names the table whose rows the result resembles, for stores
    /// that cannot infer row shape from the query text alone.
    fn execute_raw(&self, sql: &str, shape: Option<&str>) -> LoadResult<Vec<Row>>;
}

/// A shared, append-only log of every query issued, in execution order.
///
/// Supplied by the caller for testing and diagnostics; each entry is the
/// query text verbatim as issued to the executor.
#[derive(Debug, Clone, Default)]
pub struct QueryLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl QueryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one query.
    pub fn push(&self, sql: impl Into<String>) {
        self.entries.lock().push(sql.into());
    }

    /// Snapshot of all logged queries so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of logged queries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing was logged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_log_orders_entries() {
        let log = QueryLog::new();
        assert!(log.is_empty());

        let clone = log.clone();
        log.push("SELECT * FROM widgets");
        clone.push("SELECT * FROM categories WHERE id IN (1)");

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.entries(),
            vec![
                "SELECT * FROM widgets".to_string(),
                "SELECT * FROM categories WHERE id IN (1)".to_string(),
            ]
        );
    }
}
