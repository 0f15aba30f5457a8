//! Schema registry and association lookup.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::association::AssociationRef;
use crate::entity::Entity;

/// Registry of every entity the engine may touch, keyed by entity name.
///
/// Built once at setup from the host's model metadata and then only read.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entities: IndexMap<SmolStr, Arc<Entity>>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, replacing any previous entry with the same name.
    pub fn register(&mut self, entity: Entity) -> &mut Self {
        self.entities.insert(entity.name.clone(), Arc::new(entity));
        self
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Arc<Entity>> {
        self.entities.get(name)
    }

    /// Resolve an association reference on an entity, falling back to the
    /// entity's declared subclasses in order when the entity itself does not
    /// declare it.
    pub fn reference_for<'a>(
        &'a self,
        entity: &'a Entity,
        association: &str,
    ) -> Option<&'a AssociationRef> {
        if let Some(reference) = entity.reference(association) {
            return Some(reference);
        }
        entity
            .subclasses
            .iter()
            .filter_map(|name| self.entity(name))
            .find_map(|sub| sub.reference(association))
    }

    /// All associations reachable from an entity by name, subclass entries
    /// included (entity's own declarations win on name collisions).
    pub fn reflections_of<'a>(&'a self, entity: &'a Entity) -> IndexMap<SmolStr, &'a AssociationRef> {
        let mut out: IndexMap<SmolStr, &AssociationRef> = IndexMap::new();
        for sub in entity.subclasses.iter().rev() {
            if let Some(sub) = self.entity(sub) {
                for (name, reference) in &sub.associations {
                    out.insert(name.clone(), reference);
                }
            }
        }
        for (name, reference) in &entity.associations {
            out.insert(name.clone(), reference);
        }
        out
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the schema has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::association::AssociationRef;

    fn schema_with_subclass() -> Schema {
        let mut schema = Schema::new();
        schema.register(
            Entity::new("Widget", "widgets")
                .association(AssociationRef::belongs_to("category", "Category", "category_id"))
                .subclass("PremiumWidget"),
        );
        schema.register(
            Entity::new("PremiumWidget", "widgets")
                .association(AssociationRef::has_one("warranty", "Warranty", "widget_id")),
        );
        schema.register(Entity::new("Category", "categories"));
        schema
    }

    #[test]
    fn test_entity_lookup() {
        let schema = schema_with_subclass();
        assert!(schema.entity("Widget").is_some());
        assert!(schema.entity("Gadget").is_none());
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_reference_on_entity_itself() {
        let schema = schema_with_subclass();
        let widget = schema.entity("Widget").unwrap();
        let r = schema.reference_for(widget, "category").unwrap();
        assert_eq!(r.target.as_deref(), Some("Category"));
    }

    #[test]
    fn test_reference_falls_back_to_subclass() {
        let schema = schema_with_subclass();
        let widget = schema.entity("Widget").unwrap();
        let r = schema.reference_for(widget, "warranty").unwrap();
        assert_eq!(r.target.as_deref(), Some("Warranty"));
    }

    #[test]
    fn test_reference_not_found() {
        let schema = schema_with_subclass();
        let widget = schema.entity("Widget").unwrap();
        assert!(schema.reference_for(widget, "orders").is_none());
    }

    #[test]
    fn test_reflections_of_entity_built_outside_the_schema() {
        // The entity need not live in the registry; references from both it
        // and the registered subclasses come back together.
        let schema = schema_with_subclass();
        let widget = Entity::new("Widget", "widgets")
            .association(AssociationRef::belongs_to("category", "Category", "category_id"))
            .subclass("PremiumWidget");

        let all = schema.reflections_of(&widget);
        assert!(all.contains_key("category"));
        assert!(all.contains_key("warranty"));
    }

    #[test]
    fn test_reflections_include_subclasses() {
        let schema = schema_with_subclass();
        let widget = schema.entity("Widget").unwrap();
        let all = schema.reflections_of(widget);
        assert!(all.contains_key("category"));
        assert!(all.contains_key("warranty"));
    }
}
