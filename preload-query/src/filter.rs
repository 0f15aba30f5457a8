//! Query predicates.
//!
//! The engine only ever issues two shapes of predicate on its own: an
//! equality test (from caller scopes) and a single-column membership test,
//! the id-list constraint every loader builds from a batch's distinct key
//! set. `And` combines them.

use smol_str::SmolStr;

use crate::value::Value;

/// A predicate restricting a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// No filter (always true).
    None,
    /// Equality comparison.
    Equals(SmolStr, Value),
    /// Membership in a finite value set.
    In(SmolStr, Vec<Value>),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
}

impl Filter {
    /// Create an empty filter (matches everything).
    pub fn none() -> Self {
        Self::None
    }

    /// Check if this filter is empty.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Combine this filter with another using AND.
    pub fn and_then(self, other: Filter) -> Filter {
        match (self, other) {
            (Self::None, f) | (f, Self::None) => f,
            (Self::And(mut filters), f) => {
                filters.push(f);
                Self::And(filters)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Render the SQL fragment (without the `WHERE` keyword), with inline
    /// literals so the query log shows the query verbatim as issued.
    pub fn to_sql(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Equals(column, value) => {
                format!("{} = {}", column, value.to_sql_literal())
            }
            Self::In(column, values) => {
                let list = values
                    .iter()
                    .map(Value::to_sql_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} IN ({})", column, list)
            }
            Self::And(filters) => filters
                .iter()
                .filter(|f| !f.is_none())
                .map(Filter::to_sql)
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::None
    }
}
