//! # Preload
//!
//! Batched eager loading for relational data, without an ORM.
//!
//! Preload fetches a batch of root rows and resolves each requested
//! association with one query per association per batch, turning the
//! classic N+1 query pattern into 1+A queries. It is store-agnostic:
//! you describe entities and associations in a [`schema::Schema`], supply
//! a [`query::QueryExecutor`] that runs the queries it builds, and get
//! back plain rows with their associations attached.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use preload::prelude::*;
//!
//! let mut schema = Schema::new();
//! schema.register(
//!     Entity::new("Customer", "customers")
//!         .association(AssociationRef::has_many("orders", "Order", "customer_id")),
//! );
//! schema.register(
//!     Entity::new("Order", "orders")
//!         .association(AssociationRef::has_many("line_items", "LineItem", "order_id")),
//! );
//! schema.register(Entity::new("LineItem", "line_items"));
//!
//! let customers = EagerQuery::new(&schema, &executor, "Customer")
//!     .eager_load(EagerLoad::new("orders").nest(EagerLoad::new("line_items")))
//!     .run()?;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Entity and association metadata.
pub mod schema {
    pub use preload_schema::*;
}

/// The query engine: eager-load specs, batching, and the executor boundary.
pub mod query {
    pub use preload_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::prelude::*;
    pub use crate::schema::{AssociationKind, AssociationRef, Entity, JoinTable, Schema};
}

// Re-export key types at the crate root
pub use query::{EagerLoad, EagerQuery, LoadError, LoadResult, Row};
pub use schema::{Entity, Schema};
