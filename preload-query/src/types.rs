//! Shared query types: sort order and column selection.

use std::fmt;

use smol_str::SmolStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first).
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortOrder {
    /// Get the SQL keyword for this sort order.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Order by specification for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByField {
    /// The column name to order by.
    pub column: SmolStr,
    /// The sort order.
    pub order: SortOrder,
}

impl OrderByField {
    /// Order ascending by a column.
    pub fn asc(column: impl Into<SmolStr>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Asc,
        }
    }

    /// Order descending by a column.
    pub fn desc(column: impl Into<SmolStr>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Desc,
        }
    }

    /// Render the SQL fragment for this field.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.order.as_sql())
    }
}

/// Ordering over zero or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBy {
    fields: Vec<OrderByField>,
}

impl OrderBy {
    /// Create an empty ordering.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if no ordering was specified.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a field to the ordering.
    pub fn then(mut self, field: OrderByField) -> Self {
        self.fields.push(field);
        self
    }

    /// The ordered fields.
    pub fn fields(&self) -> &[OrderByField] {
        &self.fields
    }

    /// Render the SQL fragment (without the `ORDER BY` keyword).
    pub fn to_sql(&self) -> String {
        self.fields
            .iter()
            .map(OrderByField::to_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<OrderByField> for OrderBy {
    fn from(field: OrderByField) -> Self {
        Self {
            fields: vec![field],
        }
    }
}

/// Column projection for a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Select {
    /// Select all columns.
    #[default]
    All,
    /// Select specific columns.
    Columns(Vec<SmolStr>),
}

impl Select {
    /// Build a projection over specific columns.
    pub fn columns(columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        Self::Columns(columns.into_iter().map(Into::into).collect())
    }

    /// Render the SQL select list.
    pub fn to_sql(&self) -> String {
        match self {
            Self::All => "*".to_string(),
            Self::Columns(cols) => cols
                .iter()
                .map(SmolStr::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
