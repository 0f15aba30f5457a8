//! The merge engine: grouping fetched rows by key and assigning them to
//! parents.
//!
//! Grouping is one pass over the children and assignment is one pass over
//! the parents: O(parents + children) with O(1) average lookups, never a
//! nested scan. Arrival order is preserved within each group, so plural
//! assignments keep the associated query's own order and singular
//! assignments take its first row.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::LoadResult;
use crate::row::{Attached, Row};
use crate::value::Value;

/// Group child rows by the value of `key` in one pass.
///
/// Rows with a `Null` key are dropped (they can match no parent); rows
/// missing the key column entirely fail with `MissingColumn`.
pub(crate) fn group_by_key(
    children: Vec<Row>,
    key: &str,
) -> LoadResult<IndexMap<Value, Vec<Row>>> {
    let mut groups: IndexMap<Value, Vec<Row>> = IndexMap::new();
    for child in children {
        let value = child.require(key)?.clone();
        if value.is_null() {
            continue;
        }
        groups.entry(value).or_default().push(child);
    }
    Ok(groups)
}

/// Assign a singular result to every parent: the first grouped child for the
/// parent's key, or absent. Every parent's slot is written.
pub(crate) fn assign_one(
    parents: &mut [Row],
    parent_key: &str,
    slot: &SmolStr,
    groups: &IndexMap<Value, Vec<Row>>,
) -> LoadResult<()> {
    for parent in parents {
        let key = parent.require(parent_key)?.clone();
        let matched = if key.is_null() {
            None
        } else {
            groups.get(&key).and_then(|rows| rows.first()).cloned()
        };
        parent.attach(slot.clone(), Attached::One(matched));
    }
    Ok(())
}

/// Assign a plural result to every parent: the full grouped sequence for the
/// parent's key, or empty. Every parent's slot is written.
pub(crate) fn assign_many(
    parents: &mut [Row],
    parent_key: &str,
    slot: &SmolStr,
    groups: &IndexMap<Value, Vec<Row>>,
) -> LoadResult<()> {
    for parent in parents {
        let key = parent.require(parent_key)?.clone();
        let matched = if key.is_null() {
            Vec::new()
        } else {
            groups.get(&key).cloned().unwrap_or_default()
        };
        parent.attach(slot.clone(), Attached::Many(matched));
    }
    Ok(())
}
