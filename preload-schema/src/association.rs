//! Association reference metadata.

use serde::Serialize;
use smol_str::SmolStr;

/// Kind of association between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssociationKind {
    /// The owner holds a foreign key to the target (e.g. Widget belongs to Category).
    BelongsTo,
    /// Belongs-to whose target entity varies per row, disambiguated by a type column.
    PolymorphicBelongsTo,
    /// One target row holds a foreign key back to the owner.
    HasOne,
    /// Many target rows hold a foreign key back to the owner.
    HasMany,
    /// Many-to-many through a join table.
    HasAndBelongsToMany,
    /// Multi-hop association declared on the model. Carried in metadata for
    /// completeness but not directly loadable; express the chain with nested
    /// eager-load specs instead.
    HasManyThrough,
}

impl AssociationKind {
    /// Name of the kind as it appears in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelongsTo => "belongs_to",
            Self::PolymorphicBelongsTo => "polymorphic belongs_to",
            Self::HasOne => "has_one",
            Self::HasMany => "has_many",
            Self::HasAndBelongsToMany => "has_and_belongs_to_many",
            Self::HasManyThrough => "has_many :through",
        }
    }

    /// Check if this kind attaches a sequence of rows rather than a single row.
    pub fn is_many(&self) -> bool {
        matches!(
            self,
            Self::HasMany | Self::HasAndBelongsToMany | Self::HasManyThrough
        )
    }
}

/// Join table description for a many-to-many association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinTable {
    /// Name of the join table.
    pub table: SmolStr,
    /// Column referencing the owning entity.
    pub source_column: SmolStr,
    /// Column referencing the target entity.
    pub target_column: SmolStr,
}

impl JoinTable {
    /// Create a new join table description.
    pub fn new(
        table: impl Into<SmolStr>,
        source_column: impl Into<SmolStr>,
        target_column: impl Into<SmolStr>,
    ) -> Self {
        Self {
            table: table.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
        }
    }
}

/// Metadata for one declared association.
///
/// Exactly one local-key/foreign-key mapping exists per reference. For
/// `BelongsTo` the `foreign_key` lives on the owning entity; for `HasOne` and
/// `HasMany` it lives on the target and points back at the owner. Polymorphic
/// references carry a `type_column` on the owner instead of a fixed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationRef {
    /// Association name as declared on the owning entity.
    pub name: SmolStr,
    /// Kind of association.
    pub kind: AssociationKind,
    /// Target entity name. `None` for polymorphic references, which resolve
    /// the target per row from `type_column`.
    pub target: Option<SmolStr>,
    /// The single foreign-key column of this reference.
    pub foreign_key: SmolStr,
    /// Type column naming the target entity per row (polymorphic only).
    pub type_column: Option<SmolStr>,
    /// Join table (many-to-many only).
    pub join_table: Option<JoinTable>,
    /// Intermediate association name (`has_many :through` only).
    pub through: Option<SmolStr>,
}

impl AssociationRef {
    /// Create a belongs-to reference. `foreign_key` is the column on the
    /// owning entity holding the target's primary key.
    pub fn belongs_to(
        name: impl Into<SmolStr>,
        target: impl Into<SmolStr>,
        foreign_key: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::BelongsTo,
            target: Some(target.into()),
            foreign_key: foreign_key.into(),
            type_column: None,
            join_table: None,
            through: None,
        }
    }

    /// Create a polymorphic belongs-to reference. `type_column` holds the
    /// target entity name per row; `foreign_key` holds its primary key.
    pub fn polymorphic_belongs_to(
        name: impl Into<SmolStr>,
        type_column: impl Into<SmolStr>,
        foreign_key: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::PolymorphicBelongsTo,
            target: None,
            foreign_key: foreign_key.into(),
            type_column: Some(type_column.into()),
            join_table: None,
            through: None,
        }
    }

    /// Create a has-one reference. `foreign_key` is the column on the target
    /// pointing back at the owner's primary key.
    pub fn has_one(
        name: impl Into<SmolStr>,
        target: impl Into<SmolStr>,
        foreign_key: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::HasOne,
            target: Some(target.into()),
            foreign_key: foreign_key.into(),
            type_column: None,
            join_table: None,
            through: None,
        }
    }

    /// Create a has-many reference. `foreign_key` is the column on the target
    /// pointing back at the owner's primary key.
    pub fn has_many(
        name: impl Into<SmolStr>,
        target: impl Into<SmolStr>,
        foreign_key: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::HasMany,
            target: Some(target.into()),
            foreign_key: foreign_key.into(),
            type_column: None,
            join_table: None,
            through: None,
        }
    }

    /// Create a many-to-many reference resolved through a join table.
    pub fn has_and_belongs_to_many(
        name: impl Into<SmolStr>,
        target: impl Into<SmolStr>,
        join_table: JoinTable,
    ) -> Self {
        let foreign_key = join_table.target_column.clone();
        Self {
            name: name.into(),
            kind: AssociationKind::HasAndBelongsToMany,
            target: Some(target.into()),
            foreign_key,
            type_column: None,
            join_table: Some(join_table),
            through: None,
        }
    }

    /// Create a has-many-through reference. Present for metadata fidelity;
    /// the engine rejects it at dispatch and the chain must be expressed as
    /// nested eager-load specs.
    pub fn has_many_through(
        name: impl Into<SmolStr>,
        target: impl Into<SmolStr>,
        through: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::HasManyThrough,
            target: Some(target.into()),
            foreign_key: SmolStr::default(),
            type_column: None,
            join_table: None,
            through: Some(through.into()),
        }
    }

    /// Check if this reference resolves its target per row.
    pub fn is_polymorphic(&self) -> bool {
        self.kind == AssociationKind::PolymorphicBelongsTo
    }
}
