//! Ad-hoc eager loads: associations defined by raw SQL instead of declared
//! metadata.
//!
//! An ad-hoc load still follows the batch contract: one raw query per batch
//! of parents, keyed on the distinct non-null values of the parent-side
//! column, merged back by the child-side column. The mapping between those
//! two columns must be exactly one pair, validated at construction before
//! any query runs.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{LoadError, LoadResult};
use crate::executor::QueryExecutor;
use crate::row::{Capability, Row};
use crate::value::Value;

use super::loader::LoadContext;
use super::merge;
use super::spec::EagerLoad;
use super::{loader, resolve_all};

/// An eager load backed by caller-supplied SQL.
///
/// The SQL must contain a `%{ids}` placeholder, replaced at execution time
/// with the comma-joined literal key set for the batch. Further named binds
/// may be supplied with [`bind`](Self::bind) and referenced as `%{name}`.
///
/// # Example
///
/// ```rust,ignore
/// let totals = AdHocEagerLoad::new(
///     "order_totals",
///     [("id", "customer_id")],
///     "SELECT customer_id, SUM(amount) AS total FROM orders \
///      WHERE customer_id IN (%{ids}) GROUP BY customer_id",
/// )?;
/// ```
#[derive(Clone)]
pub struct AdHocEagerLoad {
    /// Slot name results are attached under.
    pub name: SmolStr,
    /// Parent-side key column (read from the batch rows).
    parent_key: SmolStr,
    /// Child-side key column (read from the fetched rows).
    child_key: SmolStr,
    sql: String,
    binds: IndexMap<SmolStr, Value>,
    entity: Option<SmolStr>,
    capabilities: Vec<Arc<dyn Capability>>,
    nested: Vec<EagerLoad>,
    singular: bool,
}

impl AdHocEagerLoad {
    /// Create an ad-hoc load.
    ///
    /// `mapping` pairs the parent-side column with the child-side column and
    /// must contain exactly one pair; anything else fails with
    /// [`LoadError::MalformedAdHocMapping`] before any query is issued.
    pub fn new(
        name: impl Into<SmolStr>,
        mapping: impl IntoIterator<Item = (impl Into<SmolStr>, impl Into<SmolStr>)>,
        sql: impl Into<String>,
    ) -> LoadResult<Self> {
        let name = name.into();
        let mut pairs: Vec<(SmolStr, SmolStr)> = mapping
            .into_iter()
            .map(|(parent, child)| (parent.into(), child.into()))
            .collect();
        if pairs.len() != 1 {
            return Err(LoadError::MalformedAdHocMapping {
                name: name.to_string(),
                got: pairs.len(),
            });
        }
        let (parent_key, child_key) = pairs.remove(0);
        Ok(Self {
            name,
            parent_key,
            child_key,
            sql: sql.into(),
            binds: IndexMap::new(),
            entity: None,
            capabilities: Vec::new(),
            nested: Vec::new(),
            singular: false,
        })
    }

    /// Supply a named bind, referenced in the SQL as `%{name}`.
    pub fn bind(mut self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.binds.insert(name.into(), value.into());
        self
    }

    /// Name the schema entity the fetched rows belong to. Required when
    /// nesting further eager loads under this one.
    pub fn entity(mut self, name: impl Into<SmolStr>) -> Self {
        self.entity = Some(name.into());
        self
    }

    /// Attach a capability to every fetched row.
    pub fn augment(mut self, capability: Arc<dyn Capability>) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Nest a declared eager load under this one. Requires
    /// [`entity`](Self::entity) so the nested association can be resolved.
    pub fn nest(mut self, spec: EagerLoad) -> Self {
        self.nested.push(spec);
        self
    }

    /// Attach a single row per parent instead of a sequence.
    pub fn singular(mut self) -> Self {
        self.singular = true;
        self
    }

    /// Render the SQL for one batch: `%{ids}` becomes the comma-joined
    /// literal key set, named binds become single literals.
    fn render_sql(&self, keys: &[Value]) -> String {
        let ids = keys
            .iter()
            .map(Value::to_sql_literal)
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = self.sql.replace("%{ids}", &ids);
        for (name, value) in &self.binds {
            sql = sql.replace(&format!("%{{{name}}}"), &value.to_sql_literal());
        }
        sql
    }

    pub(crate) fn run<E: QueryExecutor>(
        &self,
        ctx: &LoadContext<'_, E>,
        rows: &mut [Row],
    ) -> LoadResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let keys = loader::collect_keys(rows, &self.parent_key)?;
        let sql = self.render_sql(&keys);
        let mut children = ctx.fetch_raw(&sql, self.entity.as_deref())?;

        if !self.capabilities.is_empty() {
            for child in &mut children {
                child.extend_capabilities(self.capabilities.iter().cloned());
            }
        }
        if !self.nested.is_empty() {
            let Some(entity_name) = self.entity.as_deref() else {
                return Err(LoadError::AdHocMissingEntity {
                    name: self.name.to_string(),
                });
            };
            let target = ctx.entity(entity_name)?;
            resolve_all(ctx, target, &self.nested, &mut children)?;
        }

        let groups = merge::group_by_key(children, &self.child_key)?;
        if self.singular {
            merge::assign_one(rows, &self.parent_key, &self.name, &groups)
        } else {
            merge::assign_many(rows, &self.parent_key, &self.name, &groups)
        }
    }
}

impl fmt::Debug for AdHocEagerLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdHocEagerLoad")
            .field("name", &self.name)
            .field("parent_key", &self.parent_key)
            .field("child_key", &self.child_key)
            .field("sql", &self.sql)
            .field("binds", &self.binds)
            .field("entity", &self.entity)
            .field("nested", &self.nested)
            .field("singular", &self.singular)
            .finish()
    }
}
