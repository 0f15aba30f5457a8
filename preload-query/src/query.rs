//! The top-level query builder: base query plus eager-load specs.

use preload_schema::Schema;
use smol_str::SmolStr;

use crate::batch::BatchWindows;
use crate::eager::{AdHocEagerLoad, EagerLoad, LoadContext, resolve_all};
use crate::error::{LoadError, LoadResult};
use crate::executor::{QueryExecutor, QueryLog};
use crate::filter::Filter;
use crate::pagination::Pagination;
use crate::row::Row;
use crate::sql::SelectQuery;
use crate::types::{OrderBy, Select};

/// A query over one root entity with eager-loaded associations.
///
/// Builds the base query, runs it through the executor, then resolves every
/// eager-load spec against the fetched batch: one query per association per
/// batch, regardless of row count.
///
/// # Example
///
/// ```rust,ignore
/// let customers = EagerQuery::new(&schema, &executor, "Customer")
///     .r#where(Filter::Equals("region".into(), "west".into()))
///     .eager_load(EagerLoad::new("orders").nest(EagerLoad::new("line_items")))
///     .run()?;
/// ```
pub struct EagerQuery<'a, E: QueryExecutor> {
    schema: &'a Schema,
    executor: &'a E,
    entity: SmolStr,
    select: Select,
    filter: Filter,
    order_by: OrderBy,
    pagination: Pagination,
    eager: Vec<EagerLoad>,
    ad_hoc: Vec<AdHocEagerLoad>,
    logger: Option<QueryLog>,
}

impl<'a, E: QueryExecutor> EagerQuery<'a, E> {
    /// Start a query over the named entity. The name is resolved against the
    /// schema when the query runs; an unregistered name fails then with
    /// [`LoadError::UnknownEntity`].
    pub fn new(schema: &'a Schema, executor: &'a E, entity: impl Into<SmolStr>) -> Self {
        Self {
            schema,
            executor,
            entity: entity.into(),
            select: Select::All,
            filter: Filter::None,
            order_by: OrderBy::none(),
            pagination: Pagination::new(),
            eager: Vec::new(),
            ad_hoc: Vec::new(),
            logger: None,
        }
    }

    /// Add a filter condition (AND-combined with any existing filter).
    pub fn r#where(mut self, filter: Filter) -> Self {
        self.filter = self.filter.and_then(filter);
        self
    }

    /// Set the root projection. The merge keys eager loads read must stay in
    /// the projection.
    pub fn select(mut self, columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.select = Select::columns(columns);
        self
    }

    /// Set the root ordering.
    pub fn order_by(mut self, order: impl Into<OrderBy>) -> Self {
        self.order_by = order.into();
        self
    }

    /// Skip a number of root records.
    pub fn skip(mut self, n: u64) -> Self {
        self.pagination = self.pagination.skip(n);
        self
    }

    /// Take a limited number of root records.
    pub fn take(mut self, n: u64) -> Self {
        self.pagination = self.pagination.take(n);
        self
    }

    /// Eager-load an association. Accepts a bare association name or a full
    /// [`EagerLoad`] spec.
    pub fn eager_load(mut self, spec: impl Into<EagerLoad>) -> Self {
        self.eager.push(spec.into());
        self
    }

    /// Eager-load an association defined by raw SQL.
    pub fn eager_load_ad_hoc(mut self, load: AdHocEagerLoad) -> Self {
        self.ad_hoc.push(load);
        self
    }

    /// Record every issued query in the given log.
    pub fn query_logger(mut self, log: QueryLog) -> Self {
        self.logger = Some(log);
        self
    }

    fn base_query(&self, table: SmolStr) -> SelectQuery {
        let mut query = SelectQuery::table(table)
            .select(self.select.clone())
            .r#where(self.filter.clone())
            .order_by(self.order_by.clone());
        query.pagination = self.pagination;
        query
    }

    fn resolve_eager(&self, ctx: &LoadContext<'_, E>, rows: &mut [Row]) -> LoadResult<()> {
        let entity = ctx.entity(&self.entity)?;
        resolve_all(ctx, entity, &self.eager, rows)?;
        for load in &self.ad_hoc {
            load.run(ctx, rows)?;
        }
        Ok(())
    }

    /// Execute the base query and resolve all eager loads against the
    /// result. Any failure aborts the whole run.
    pub fn run(&self) -> LoadResult<Vec<Row>> {
        let entity = self
            .schema
            .entity(&self.entity)
            .ok_or_else(|| LoadError::unknown_entity(self.entity.as_str()))?;
        let ctx = LoadContext::new(self.schema, self.executor, self.logger.as_ref());

        let mut rows = ctx.fetch(&self.base_query(entity.table.clone()))?;
        self.resolve_eager(&ctx, &mut rows)?;
        Ok(rows)
    }

    /// Execute in batches of `batch_size`, invoking `f` once per non-empty
    /// batch with fully resolved rows.
    ///
    /// Windows respect any skip/take already on the query: the first window
    /// starts at the base offset and the windows together never exceed the
    /// base limit. Execution stops on a short read, so an exhausted source
    /// never produces an empty callback; zero matching rows means zero
    /// invocations.
    pub fn find_in_batches(
        &self,
        batch_size: u64,
        mut f: impl FnMut(Vec<Row>) -> LoadResult<()>,
    ) -> LoadResult<()> {
        let entity = self
            .schema
            .entity(&self.entity)
            .ok_or_else(|| LoadError::unknown_entity(self.entity.as_str()))?;
        let ctx = LoadContext::new(self.schema, self.executor, self.logger.as_ref());

        let mut windows =
            BatchWindows::new(self.pagination.skip, self.pagination.take, batch_size);
        while let Some((skip, take)) = windows.next_window() {
            let mut query = self.base_query(entity.table.clone());
            query.pagination = Pagination::new().skip(skip).take(take);

            let mut rows = ctx.fetch(&query)?;
            let count = rows.len() as u64;
            if count > 0 {
                self.resolve_eager(&ctx, &mut rows)?;
                f(rows)?;
            }
            windows.advance(count);
            if count < take {
                break;
            }
        }
        Ok(())
    }

    /// Execute in batches, invoking `f` once per row.
    pub fn find_each(
        &self,
        batch_size: u64,
        mut f: impl FnMut(Row) -> LoadResult<()>,
    ) -> LoadResult<()> {
        self.find_in_batches(batch_size, |rows| {
            for row in rows {
                f(row)?;
            }
            Ok(())
        })
    }
}
