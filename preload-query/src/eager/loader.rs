//! Loader dispatch and the per-kind loading strategies.
//!
//! Every strategy follows the same contract: collect the distinct non-null
//! key values the batch of parent rows needs, issue exactly one associated
//! query for the whole key set, resolve any nested specs against the fetched
//! rows depth-first, then merge results back onto the parents. Every parent
//! slot is written: absent for singular misses, empty for plural ones.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use preload_schema::{AssociationKind, AssociationRef, Entity, Schema};
use smol_str::SmolStr;
use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::executor::{QueryExecutor, QueryLog};
use crate::filter::Filter;
use crate::row::{Attached, Row};
use crate::sql::SelectQuery;
use crate::value::Value;

use super::merge;
use super::optimize::narrowed_select;
use super::spec::EagerLoad;

/// Shared state for one eager-load resolution pass.
pub(crate) struct LoadContext<'a, E: QueryExecutor> {
    pub(crate) schema: &'a Schema,
    pub(crate) executor: &'a E,
    pub(crate) logger: Option<&'a QueryLog>,
}

impl<'a, E: QueryExecutor> LoadContext<'a, E> {
    pub(crate) fn new(schema: &'a Schema, executor: &'a E, logger: Option<&'a QueryLog>) -> Self {
        Self {
            schema,
            executor,
            logger,
        }
    }

    /// Run one query through the executor, logging it verbatim as issued.
    pub(crate) fn fetch(&self, query: &SelectQuery) -> LoadResult<Vec<Row>> {
        let sql = query.to_sql();
        if let Some(log) = self.logger {
            log.push(sql.clone());
        }
        debug!(sql = %sql, "executing query");
        self.executor.execute(query)
    }

    /// Run raw SQL through the executor, logging it verbatim as issued.
    pub(crate) fn fetch_raw(&self, sql: &str, shape: Option<&str>) -> LoadResult<Vec<Row>> {
        if let Some(log) = self.logger {
            log.push(sql.to_string());
        }
        debug!(sql = %sql, "executing raw query");
        self.executor.execute_raw(sql, shape)
    }

    /// Resolve an entity name against the schema.
    pub(crate) fn entity(&self, name: &str) -> LoadResult<&'a Arc<Entity>> {
        self.schema
            .entity(name)
            .ok_or_else(|| LoadError::unknown_entity(name))
    }
}

/// Resolve every spec at this level against the given rows, in order.
pub(crate) fn resolve_all<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    entity: &Entity,
    specs: &[EagerLoad],
    rows: &mut [Row],
) -> LoadResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    for spec in specs {
        resolve_spec(ctx, entity, spec, rows)?;
    }
    Ok(())
}

/// Dispatch one spec to its loading strategy by reference kind.
fn resolve_spec<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    entity: &Entity,
    spec: &EagerLoad,
    rows: &mut [Row],
) -> LoadResult<()> {
    let reference = ctx
        .schema
        .reference_for(entity, &spec.association)
        .ok_or_else(|| {
            LoadError::unknown_association(entity.name.as_str(), spec.association.as_str())
        })?;

    match reference.kind {
        AssociationKind::BelongsTo => load_belongs_to(ctx, reference, spec, rows),
        AssociationKind::PolymorphicBelongsTo => {
            load_polymorphic_belongs_to(ctx, reference, spec, rows)
        }
        AssociationKind::HasOne => load_has(ctx, entity, reference, spec, rows, false),
        AssociationKind::HasMany => load_has(ctx, entity, reference, spec, rows, true),
        AssociationKind::HasAndBelongsToMany => load_habtm(ctx, entity, reference, spec, rows),
        AssociationKind::HasManyThrough => Err(LoadError::UnsupportedKind {
            entity: entity.name.to_string(),
            association: spec.association.to_string(),
            kind: reference.kind.as_str().to_string(),
        }),
    }
}

/// Distinct non-null values of `column` across the batch, in first-seen
/// order. A row without the column at all is a projection mistake on the
/// query that produced it and fails the whole resolution.
pub(crate) fn collect_keys(rows: &[Row], column: &str) -> LoadResult<Vec<Value>> {
    let mut keys: IndexSet<Value> = IndexSet::new();
    for row in rows {
        let value = row.require(column)?;
        if !value.is_null() {
            keys.insert(value.clone());
        }
    }
    Ok(keys.into_iter().collect())
}

/// Build the associated query for a stage: key-set constraint, caller
/// select/scope, then the optimizer's projection override when this stage
/// only exists to continue a chain.
fn stage_query<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    target: &Entity,
    key_column: &SmolStr,
    keys: Vec<Value>,
    merge_key: &str,
    spec: &EagerLoad,
) -> LoadResult<SelectQuery> {
    let mut query =
        SelectQuery::table(target.table.clone()).r#where(Filter::In(key_column.clone(), keys));
    if let Some(select) = &spec.select {
        query = query.select(select.clone());
    }
    if let Some(scope) = &spec.scope {
        query = scope(query);
    }
    if let Some(narrowed) = narrowed_select(ctx.schema, target, merge_key, spec)? {
        query = query.select(narrowed);
    }
    Ok(query)
}

/// Fetch a stage's rows, attach the spec's capabilities, and resolve nested
/// specs depth-first so merged rows already carry their own associations.
fn fetch_stage<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    target: &Entity,
    query: &SelectQuery,
    spec: &EagerLoad,
) -> LoadResult<Vec<Row>> {
    let mut children = ctx.fetch(query)?;
    if !spec.capabilities.is_empty() {
        for child in &mut children {
            child.extend_capabilities(spec.capabilities.iter().cloned());
        }
    }
    resolve_all(ctx, target, &spec.nested, &mut children)?;
    Ok(children)
}

fn target_entity<'a, E: QueryExecutor>(
    ctx: &LoadContext<'a, E>,
    reference: &AssociationRef,
) -> LoadResult<&'a Arc<Entity>> {
    ctx.entity(reference.target.as_deref().unwrap_or_default())
}

fn load_belongs_to<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    reference: &AssociationRef,
    spec: &EagerLoad,
    rows: &mut [Row],
) -> LoadResult<()> {
    let foreign_key = &reference.foreign_key;
    let keys = collect_keys(rows, foreign_key)?;
    let target = target_entity(ctx, reference)?;

    let query = stage_query(ctx, target, &target.primary_key, keys, &target.primary_key, spec)?;
    let children = fetch_stage(ctx, target, &query, spec)?;

    let groups = merge::group_by_key(children, &target.primary_key)?;
    merge::assign_one(rows, foreign_key, spec.slot(), &groups)
}

/// HasOne and HasMany share everything but the assignment arity. HasOne
/// keeps the first row in the associated query's own order and silently
/// discards extras, so the tie-break is whatever ordering the caller's
/// scope imposes.
fn load_has<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    entity: &Entity,
    reference: &AssociationRef,
    spec: &EagerLoad,
    rows: &mut [Row],
    many: bool,
) -> LoadResult<()> {
    let primary_key = &entity.primary_key;
    let foreign_key = &reference.foreign_key;
    let keys = collect_keys(rows, primary_key)?;
    let target = target_entity(ctx, reference)?;

    let query = stage_query(ctx, target, foreign_key, keys, foreign_key, spec)?;
    let children = fetch_stage(ctx, target, &query, spec)?;

    let groups = merge::group_by_key(children, foreign_key)?;
    if many {
        merge::assign_many(rows, primary_key, spec.slot(), &groups)
    } else {
        merge::assign_one(rows, primary_key, spec.slot(), &groups)
    }
}

/// Polymorphic belongs-to: rows in the same batch may point at different
/// target tables, so parents are grouped by type value and one query is
/// issued per distinct type present in the batch.
fn load_polymorphic_belongs_to<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    reference: &AssociationRef,
    spec: &EagerLoad,
    rows: &mut [Row],
) -> LoadResult<()> {
    let type_column = reference.type_column.as_deref().unwrap_or_default();
    let foreign_key = &reference.foreign_key;
    let slot = spec.slot().clone();

    let mut by_type: IndexMap<SmolStr, Vec<usize>> = IndexMap::new();
    let mut unmatched: Vec<usize> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let type_value = row.require(type_column)?;
        let key = row.require(foreign_key)?;
        if type_value.is_null() || key.is_null() {
            unmatched.push(index);
        } else {
            let name = match type_value {
                Value::String(s) => SmolStr::new(s),
                other => SmolStr::new(other.to_string()),
            };
            by_type.entry(name).or_default().push(index);
        }
    }

    for (type_name, indices) in &by_type {
        let target = ctx.entity(type_name)?;

        let mut keys: IndexSet<Value> = IndexSet::new();
        for &index in indices {
            keys.insert(rows[index].require(foreign_key)?.clone());
        }

        let query = stage_query(
            ctx,
            target,
            &target.primary_key,
            keys.into_iter().collect(),
            &target.primary_key,
            spec,
        )?;
        let children = fetch_stage(ctx, target, &query, spec)?;
        let groups = merge::group_by_key(children, &target.primary_key)?;

        for &index in indices {
            let key = rows[index].require(foreign_key)?.clone();
            let matched = groups.get(&key).and_then(|rows| rows.first()).cloned();
            rows[index].attach(slot.clone(), Attached::One(matched));
        }
    }

    for &index in &unmatched {
        rows[index].attach(slot.clone(), Attached::One(None));
    }
    Ok(())
}

/// Many-to-many: two stages. The join table yields owner-key/target-key
/// pairs for the batch, the target table yields the rows for the distinct
/// target-key set; merging groups the pairs and looks targets up by primary
/// key, preserving join-row order per parent.
fn load_habtm<E: QueryExecutor>(
    ctx: &LoadContext<'_, E>,
    entity: &Entity,
    reference: &AssociationRef,
    spec: &EagerLoad,
    rows: &mut [Row],
) -> LoadResult<()> {
    let Some(join) = &reference.join_table else {
        return Err(LoadError::UnsupportedKind {
            entity: entity.name.to_string(),
            association: reference.name.to_string(),
            kind: "has_and_belongs_to_many without a join table".to_string(),
        });
    };
    let primary_key = &entity.primary_key;
    let keys = collect_keys(rows, primary_key)?;

    let join_query = SelectQuery::table(join.table.clone())
        .r#where(Filter::In(join.source_column.clone(), keys));
    let join_rows = ctx.fetch(&join_query)?;

    let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(join_rows.len());
    let mut target_keys: IndexSet<Value> = IndexSet::new();
    for join_row in &join_rows {
        let source = join_row.require(&join.source_column)?.clone();
        let target = join_row.require(&join.target_column)?.clone();
        if source.is_null() || target.is_null() {
            continue;
        }
        target_keys.insert(target.clone());
        pairs.push((source, target));
    }

    let target = target_entity(ctx, reference)?;
    let query = stage_query(
        ctx,
        target,
        &target.primary_key,
        target_keys.into_iter().collect(),
        &target.primary_key,
        spec,
    )?;
    let children = fetch_stage(ctx, target, &query, spec)?;
    let by_target_key = merge::group_by_key(children, &target.primary_key)?;

    let mut per_parent: IndexMap<Value, Vec<Row>> = IndexMap::new();
    for (source, target_key) in pairs {
        if let Some(child) = by_target_key.get(&target_key).and_then(|rows| rows.first()) {
            per_parent.entry(source).or_default().push(child.clone());
        }
    }
    merge::assign_many(rows, primary_key, spec.slot(), &per_parent)
}
