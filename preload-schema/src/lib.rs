//! # preload-schema
//!
//! Entity and association metadata for the Preload eager-loading engine.
//!
//! This crate provides:
//! - `Entity` descriptions (table, primary key, declared associations,
//!   known subclasses for single-table inheritance hierarchies)
//! - `AssociationRef` metadata for every supported association kind
//! - A `Schema` registry resolving entity names and association references
//!
//! The metadata here is normally produced once at startup by whatever host
//! integration owns the real ORM models, then handed to the engine by
//! reference. Nothing in this crate talks to a database.
//!
//! ## Example
//!
//! ```rust
//! use preload_schema::{AssociationRef, Entity, Schema};
//!
//! let mut schema = Schema::new();
//! schema.register(
//!     Entity::new("Widget", "widgets")
//!         .association(AssociationRef::belongs_to("category", "Category", "category_id"))
//!         .association(AssociationRef::has_many("line_items", "LineItem", "widget_id")),
//! );
//! schema.register(Entity::new("Category", "categories"));
//!
//! let widget = schema.entity("Widget").unwrap();
//! let reference = schema.reference_for(widget, "category").unwrap();
//! assert_eq!(reference.target.as_deref(), Some("Category"));
//! ```

pub mod association;
pub mod entity;
pub mod schema;

pub use association::{AssociationKind, AssociationRef, JoinTable};
pub use entity::Entity;
pub use schema::Schema;
