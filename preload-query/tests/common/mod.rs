//! Shared test fixtures: an in-memory executor and the widget store.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::cmp::Ordering;

use indexmap::IndexMap;
use preload_query::{
    Filter, LoadError, LoadResult, QueryExecutor, Row, Select, SelectQuery, SortOrder, Value,
};
use preload_schema::{AssociationRef, Entity, JoinTable, Schema};
use smol_str::SmolStr;

type RawHandler = Box<dyn Fn(&str, Option<&str>) -> LoadResult<Vec<Row>> + Send + Sync>;

/// Executes queries against in-memory tables, honoring filters, ordering,
/// pagination, and projection the way a relational store would.
pub struct MemoryExecutor {
    tables: IndexMap<SmolStr, Vec<Row>>,
    raw: Option<RawHandler>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self {
            tables: IndexMap::new(),
            raw: None,
        }
    }

    pub fn table(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(SmolStr::new(name), rows);
        self
    }

    /// Handle `execute_raw` calls with the given closure.
    pub fn raw_handler(
        mut self,
        handler: impl Fn(&str, Option<&str>) -> LoadResult<Vec<Row>> + Send + Sync + 'static,
    ) -> Self {
        self.raw = Some(Box::new(handler));
        self
    }
}

impl QueryExecutor for MemoryExecutor {
    fn execute(&self, query: &SelectQuery) -> LoadResult<Vec<Row>> {
        let Some(rows) = self.tables.get(query.table.as_str()) else {
            return Err(LoadError::executor(format!("no such table `{}`", query.table)));
        };

        let mut rows: Vec<Row> = rows
            .iter()
            .filter(|row| matches_filter(row, &query.filter))
            .cloned()
            .collect();

        if !query.order_by.is_empty() {
            rows.sort_by(|a, b| {
                for field in query.order_by.fields() {
                    let ord = compare(a.get(&field.column), b.get(&field.column));
                    let ord = match field.order {
                        SortOrder::Asc => ord,
                        SortOrder::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        let skip = query.pagination.skip.unwrap_or(0) as usize;
        let take = query.pagination.take.map_or(usize::MAX, |t| t as usize);
        let mut rows: Vec<Row> = rows.into_iter().skip(skip).take(take).collect();

        if let Select::Columns(columns) = &query.select {
            rows = rows
                .into_iter()
                .map(|row| {
                    let attrs = columns
                        .iter()
                        .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
                        .collect();
                    Row::new(row.table(), attrs)
                })
                .collect();
        }
        Ok(rows)
    }

    fn execute_raw(&self, sql: &str, shape: Option<&str>) -> LoadResult<Vec<Row>> {
        match &self.raw {
            Some(handler) => handler(sql, shape),
            None => Err(LoadError::executor("no raw handler registered")),
        }
    }
}

fn matches_filter(row: &Row, filter: &Filter) -> bool {
    match filter {
        Filter::None => true,
        Filter::Equals(column, value) => row.get(column) == Some(value),
        Filter::In(column, values) => row.get(column).is_some_and(|v| values.contains(v)),
        Filter::And(filters) => filters.iter().all(|f| matches_filter(row, f)),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Int(a)), Some(Value::Int(b))) => a.cmp(b),
        (Some(Value::Float(a)), Some(Value::Float(b))) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None, None) | (Some(Value::Null), Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

pub fn row(table: &str, pairs: &[(&str, Value)]) -> Row {
    Row::new(
        table,
        pairs
            .iter()
            .map(|(k, v)| (SmolStr::new(*k), v.clone()))
            .collect(),
    )
}

/// The widget store: customers place orders for widgets, widgets belong to
/// categories and have a one-to-one detail, line items join orders to
/// widgets, and tags attach to widgets through a join table. Reviews point
/// polymorphically at either a widget or a category.
pub fn widget_schema() -> Schema {
    let mut schema = Schema::new();
    schema.register(
        Entity::new("Customer", "customers")
            .association(AssociationRef::has_many("orders", "Order", "customer_id")),
    );
    schema.register(
        Entity::new("Order", "orders")
            .association(AssociationRef::belongs_to("customer", "Customer", "customer_id"))
            .association(AssociationRef::has_many("line_items", "LineItem", "order_id")),
    );
    schema.register(
        Entity::new("LineItem", "line_items")
            .association(AssociationRef::belongs_to("order", "Order", "order_id"))
            .association(AssociationRef::belongs_to("widget", "Widget", "widget_id"))
            .association(AssociationRef::belongs_to("category", "Category", "category_id")),
    );
    schema.register(
        Entity::new("Widget", "widgets")
            .association(AssociationRef::belongs_to("category", "Category", "category_id"))
            .association(AssociationRef::has_one("detail", "WidgetDetail", "widget_id"))
            .association(AssociationRef::has_many("line_items", "LineItem", "widget_id"))
            .association(AssociationRef::has_and_belongs_to_many(
                "tags",
                "Tag",
                JoinTable::new("widget_tags", "widget_id", "tag_id"),
            )),
    );
    schema.register(Entity::new("WidgetDetail", "widget_details"));
    schema.register(Entity::new("Category", "categories"));
    schema.register(Entity::new("Tag", "tags"));
    schema.register(
        Entity::new("Review", "reviews").association(AssociationRef::polymorphic_belongs_to(
            "subject",
            "subject_type",
            "subject_id",
        )),
    );
    schema
}

pub fn widget_store() -> MemoryExecutor {
    MemoryExecutor::new()
        .table(
            "categories",
            vec![
                row("categories", &[("id", Value::Int(1)), ("name", Value::from("Gadgets"))]),
                row("categories", &[("id", Value::Int(2)), ("name", Value::from("Gizmos"))]),
            ],
        )
        .table(
            "widgets",
            vec![
                row("widgets", &[("id", Value::Int(1)), ("name", Value::from("Widget A")), ("category_id", Value::Int(1))]),
                row("widgets", &[("id", Value::Int(2)), ("name", Value::from("Widget B")), ("category_id", Value::Int(1))]),
                row("widgets", &[("id", Value::Int(3)), ("name", Value::from("Widget C")), ("category_id", Value::Int(2))]),
                row("widgets", &[("id", Value::Int(4)), ("name", Value::from("Widget D")), ("category_id", Value::Int(2))]),
                row("widgets", &[("id", Value::Int(5)), ("name", Value::from("Widget E")), ("category_id", Value::Int(2))]),
                row("widgets", &[("id", Value::Int(6)), ("name", Value::from("Widget F")), ("category_id", Value::Null)]),
            ],
        )
        .table(
            "widget_details",
            vec![
                row("widget_details", &[("id", Value::Int(1)), ("widget_id", Value::Int(1)), ("text", Value::from("All about A"))]),
                row("widget_details", &[("id", Value::Int(2)), ("widget_id", Value::Int(2)), ("text", Value::from("All about B"))]),
                row("widget_details", &[("id", Value::Int(3)), ("widget_id", Value::Int(3)), ("text", Value::from("All about C"))]),
                row("widget_details", &[("id", Value::Int(4)), ("widget_id", Value::Int(4)), ("text", Value::from("All about D"))]),
                row("widget_details", &[("id", Value::Int(5)), ("widget_id", Value::Int(5)), ("text", Value::from("All about E"))]),
                row("widget_details", &[("id", Value::Int(6)), ("widget_id", Value::Int(6)), ("text", Value::from("All about F"))]),
            ],
        )
        .table(
            "customers",
            vec![
                row("customers", &[("id", Value::Int(1)), ("name", Value::from("Ann"))]),
                row("customers", &[("id", Value::Int(2)), ("name", Value::from("Bob"))]),
            ],
        )
        .table(
            "orders",
            vec![
                row("orders", &[("id", Value::Int(10)), ("customer_id", Value::Int(1)), ("amount", Value::Float(100.0))]),
                row("orders", &[("id", Value::Int(11)), ("customer_id", Value::Int(1)), ("amount", Value::Float(25.0))]),
                row("orders", &[("id", Value::Int(12)), ("customer_id", Value::Int(2)), ("amount", Value::Float(50.0))]),
            ],
        )
        .table(
            "line_items",
            vec![
                row("line_items", &[("id", Value::Int(100)), ("order_id", Value::Int(10)), ("widget_id", Value::Int(1)), ("category_id", Value::Int(1)), ("amount", Value::Float(70.0))]),
                row("line_items", &[("id", Value::Int(101)), ("order_id", Value::Int(10)), ("widget_id", Value::Int(3)), ("category_id", Value::Int(2)), ("amount", Value::Float(30.0))]),
                row("line_items", &[("id", Value::Int(102)), ("order_id", Value::Int(11)), ("widget_id", Value::Int(4)), ("category_id", Value::Int(2)), ("amount", Value::Float(25.0))]),
                row("line_items", &[("id", Value::Int(103)), ("order_id", Value::Int(12)), ("widget_id", Value::Int(1)), ("category_id", Value::Int(1)), ("amount", Value::Float(50.0))]),
            ],
        )
        .table(
            "widget_tags",
            vec![
                row("widget_tags", &[("widget_id", Value::Int(1)), ("tag_id", Value::Int(1))]),
                row("widget_tags", &[("widget_id", Value::Int(1)), ("tag_id", Value::Int(2))]),
                row("widget_tags", &[("widget_id", Value::Int(2)), ("tag_id", Value::Int(1))]),
            ],
        )
        .table(
            "tags",
            vec![
                row("tags", &[("id", Value::Int(1)), ("name", Value::from("new"))]),
                row("tags", &[("id", Value::Int(2)), ("name", Value::from("sale"))]),
            ],
        )
        .table(
            "reviews",
            vec![
                row("reviews", &[("id", Value::Int(1)), ("subject_type", Value::from("Widget")), ("subject_id", Value::Int(1)), ("stars", Value::Int(5))]),
                row("reviews", &[("id", Value::Int(2)), ("subject_type", Value::from("Category")), ("subject_id", Value::Int(2)), ("stars", Value::Int(3))]),
                row("reviews", &[("id", Value::Int(3)), ("subject_type", Value::from("Widget")), ("subject_id", Value::Int(3)), ("stars", Value::Int(4))]),
                row("reviews", &[("id", Value::Int(4)), ("subject_type", Value::Null), ("subject_id", Value::Null), ("stars", Value::Int(1))]),
            ],
        )
}
