//! Entity metadata.

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

use crate::association::AssociationRef;

/// Metadata for one entity: its table, primary key, declared associations,
/// and any known subclasses sharing its table.
///
/// Subclasses are held as an ordered list of entity names resolved against
/// the owning [`Schema`](crate::Schema): an explicit tree built once at
/// setup, not discovered through a global registry.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// Entity name (e.g. `Widget`).
    pub name: SmolStr,
    /// Backing table name.
    pub table: SmolStr,
    /// Primary key column.
    pub primary_key: SmolStr,
    /// Declared associations, in declaration order.
    pub associations: IndexMap<SmolStr, AssociationRef>,
    /// Names of known subclasses, in declaration order.
    pub subclasses: Vec<SmolStr>,
}

impl Entity {
    /// Create a new entity with the default `id` primary key.
    pub fn new(name: impl Into<SmolStr>, table: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: SmolStr::new_static("id"),
            associations: IndexMap::new(),
            subclasses: Vec::new(),
        }
    }

    /// Override the primary key column.
    pub fn primary_key(mut self, column: impl Into<SmolStr>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Declare an association on this entity.
    pub fn association(mut self, reference: AssociationRef) -> Self {
        self.associations.insert(reference.name.clone(), reference);
        self
    }

    /// Declare a subclass of this entity.
    pub fn subclass(mut self, name: impl Into<SmolStr>) -> Self {
        self.subclasses.push(name.into());
        self
    }

    /// Look up an association declared directly on this entity.
    pub fn reference(&self, name: &str) -> Option<&AssociationRef> {
        self.associations.get(name)
    }
}
