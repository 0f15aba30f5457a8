//! The `select` optimizer: projection narrowing for "through" stages.
//!
//! An intermediate stage exists only to carry the chain forward, so its
//! query does not need full rows, just the primary key, the column this
//! stage's merge groups children by, and the key columns that drive each
//! nested stage. Narrowing trades row width for fewer bytes transferred and
//! never changes grouping, membership, or final row counts; only the
//! attribute set available on intermediate rows differs.

use preload_schema::{AssociationKind, Entity, Schema};
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::error::LoadResult;
use crate::types::Select;

use super::spec::{EagerLoad, Optimizer};

/// Compute the narrowed projection for a stage, or `None` when the stage
/// fetches full rows (policy `None`, or nothing nested to narrow for).
///
/// When narrowing applies it overrides any caller `select` on the stage:
/// columns outside the computed set are unavailable on intermediate rows.
/// Use `Optimizer::None` to keep a custom projection instead.
pub(crate) fn narrowed_select(
    schema: &Schema,
    target: &Entity,
    merge_key: &str,
    spec: &EagerLoad,
) -> LoadResult<Option<Select>> {
    if spec.optimizer != Optimizer::Select || !spec.has_nested() {
        return Ok(None);
    }

    let mut columns: SmallVec<[SmolStr; 4]> = SmallVec::new();
    let push = |column: &SmolStr, columns: &mut SmallVec<[SmolStr; 4]>| {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    };

    push(&target.primary_key, &mut columns);
    push(&SmolStr::new(merge_key), &mut columns);

    for nested in &spec.nested {
        // Unknown nested associations fail later at dispatch with the full
        // error context; here they simply contribute no columns.
        let Some(reference) = schema.reference_for(target, &nested.association) else {
            continue;
        };
        match reference.kind {
            AssociationKind::BelongsTo => push(&reference.foreign_key, &mut columns),
            AssociationKind::PolymorphicBelongsTo => {
                if let Some(type_column) = &reference.type_column {
                    push(type_column, &mut columns);
                }
                push(&reference.foreign_key, &mut columns);
            }
            // These drive their stage off the owner's primary key, which is
            // already projected.
            AssociationKind::HasOne
            | AssociationKind::HasMany
            | AssociationKind::HasAndBelongsToMany
            | AssociationKind::HasManyThrough => {}
        }
    }

    Ok(Some(Select::Columns(columns.into_vec())))
}
