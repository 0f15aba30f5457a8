//! Query engine with batched eager loading.
//!
//! The engine fetches a batch of root rows, then resolves each requested
//! association with one query per association per batch; the classic N+1
//! pattern becomes 1+A queries no matter how many rows the batch holds.
//! It never talks to a database itself: callers supply a
//! [`QueryExecutor`](executor::QueryExecutor) that runs the
//! [`SelectQuery`](sql::SelectQuery) descriptions it builds.
//!
//! # Example
//!
//! ```rust,ignore
//! use preload_query::prelude::*;
//!
//! let customers = EagerQuery::new(&schema, &executor, "Customer")
//!     .eager_load(EagerLoad::new("orders").nest(EagerLoad::new("line_items")))
//!     .run()?;
//!
//! for customer in &customers {
//!     for order in customer.many("orders") {
//!         println!("{:?}", order.many("line_items").len());
//!     }
//! }
//! ```

mod batch;

pub mod eager;
pub mod error;
pub mod executor;
pub mod filter;
pub mod logging;
pub mod pagination;
pub mod query;
pub mod row;
pub mod sql;
pub mod types;
pub mod value;

pub use eager::{AdHocEagerLoad, EagerLoad, Optimizer, Scope, eager_load};
pub use error::{LoadError, LoadResult};
pub use executor::{QueryExecutor, QueryLog};
pub use filter::Filter;
pub use pagination::Pagination;
pub use query::EagerQuery;
pub use row::{Attached, Capability, Row};
pub use sql::SelectQuery;
pub use types::{OrderBy, OrderByField, Select, SortOrder};
pub use value::Value;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::eager::{AdHocEagerLoad, EagerLoad, Optimizer, eager_load};
    pub use crate::error::{LoadError, LoadResult};
    pub use crate::executor::{QueryExecutor, QueryLog};
    pub use crate::filter::Filter;
    pub use crate::query::EagerQuery;
    pub use crate::row::{Attached, Capability, Row};
    pub use crate::sql::SelectQuery;
    pub use crate::types::{OrderBy, OrderByField, Select, SortOrder};
    pub use crate::value::Value;
}
