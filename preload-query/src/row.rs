//! Immutable result rows and their attached associations.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{LoadError, LoadResult};
use crate::value::Value;

/// The result attached to one association slot on a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Attached {
    /// A singular association: the matching row, or absent.
    One(Option<Row>),
    /// A plural association: the matching rows in associated-query order.
    Many(Vec<Row>),
}

/// A caller-supplied augmentation applied to fetched rows.
///
/// Capabilities expose named operations computed over a row's attributes.
/// They are attached in order at row construction and consulted in order:
/// explicit delegation rather than open class extension.
pub trait Capability: fmt::Debug + Send + Sync {
    /// Names of the operations this capability provides.
    fn operations(&self) -> &[&str];

    /// Evaluate one operation over the row. Returns `None` if the operation
    /// is not recognized.
    fn invoke(&self, row: &Row, operation: &str) -> Option<Value>;
}

/// One fetched record: a read-only attribute map plus association slots.
///
/// The attribute map never changes after construction. Association slots are
/// each written at most once, by exactly one loader invocation, during eager
/// load resolution.
#[derive(Clone, Default)]
pub struct Row {
    table: SmolStr,
    attributes: IndexMap<SmolStr, Value>,
    associations: IndexMap<SmolStr, Attached>,
    capabilities: Vec<Arc<dyn Capability>>,
}

impl Row {
    /// Construct a row from one raw result record.
    pub fn new(table: impl Into<SmolStr>, attributes: IndexMap<SmolStr, Value>) -> Self {
        Self {
            table: table.into(),
            attributes,
            associations: IndexMap::new(),
            capabilities: Vec::new(),
        }
    }

    /// The table this row was fetched from.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The row's attributes, in projection order.
    pub fn attributes(&self) -> &IndexMap<SmolStr, Value> {
        &self.attributes
    }

    /// Look up an attribute by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.attributes.get(column)
    }

    /// Look up an attribute that must be present.
    ///
    /// A missing column means the query that produced this row projected it
    /// away; that is a caller configuration error, not a null value.
    pub fn require(&self, column: &str) -> LoadResult<&Value> {
        self.attributes.get(column).ok_or_else(|| LoadError::MissingColumn {
            table: self.table.to_string(),
            column: column.to_string(),
            row: format!("{:?}", self.attributes),
        })
    }

    /// The attached result for an association, if that slot was populated.
    pub fn association(&self, name: &str) -> Option<&Attached> {
        self.associations.get(name)
    }

    /// The row attached under a singular association, if any.
    pub fn one(&self, name: &str) -> Option<&Row> {
        match self.associations.get(name) {
            Some(Attached::One(row)) => row.as_ref(),
            _ => None,
        }
    }

    /// The rows attached under a plural association. Empty when the slot is
    /// unpopulated or holds a singular result.
    pub fn many(&self, name: &str) -> &[Row] {
        match self.associations.get(name) {
            Some(Attached::Many(rows)) => rows,
            _ => &[],
        }
    }

    /// Evaluate a named capability operation over this row. The first
    /// capability exposing the operation wins.
    pub fn invoke(&self, operation: &str) -> Option<Value> {
        self.capabilities
            .iter()
            .find(|cap| cap.operations().contains(&operation))
            .and_then(|cap| cap.invoke(self, operation))
    }

    /// Attach capabilities to this row, after the existing ones.
    pub fn extend_capabilities(&mut self, capabilities: impl IntoIterator<Item = Arc<dyn Capability>>) {
        self.capabilities.extend(capabilities);
    }

    /// Populate an association slot. Each slot is written at most once.
    pub(crate) fn attach(&mut self, name: SmolStr, result: Attached) {
        debug_assert!(
            !self.associations.contains_key(&name),
            "association slot `{}` written twice",
            name
        );
        self.associations.insert(name, result);
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("table", &self.table)
            .field("attributes", &self.attributes)
            .field("associations", &self.associations)
            .finish()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
            && self.attributes == other.attributes
            && self.associations == other.associations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        let attrs = pairs
            .iter()
            .map(|(k, v)| (SmolStr::new(*k), v.clone()))
            .collect();
        Row::new("widgets", attrs)
    }

    #[test]
    fn test_get_and_require() {
        let r = row(&[("id", Value::Int(1)), ("name", Value::String("A".into()))]);
        assert_eq!(r.get("id"), Some(&Value::Int(1)));
        assert!(r.get("missing").is_none());
        assert!(r.require("name").is_ok());

        let err = r.require("category_id").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
        assert!(err.to_string().contains("category_id"));
    }

    #[test]
    fn test_association_slots() {
        let mut parent = row(&[("id", Value::Int(1))]);
        let child = row(&[("id", Value::Int(10))]);

        parent.attach("detail".into(), Attached::One(Some(child.clone())));
        parent.attach("line_items".into(), Attached::Many(vec![child.clone()]));
        parent.attach("category".into(), Attached::One(None));

        assert_eq!(parent.one("detail"), Some(&child));
        assert_eq!(parent.many("line_items").len(), 1);
        assert!(parent.one("category").is_none());
        assert!(matches!(parent.association("category"), Some(Attached::One(None))));
        assert!(parent.association("unloaded").is_none());
        assert!(parent.many("unloaded").is_empty());
    }

    #[derive(Debug)]
    struct DollarAmount;

    impl Capability for DollarAmount {
        fn operations(&self) -> &[&str] {
            &["amount_usd"]
        }

        fn invoke(&self, row: &Row, operation: &str) -> Option<Value> {
            match operation {
                "amount_usd" => {
                    let cents = row.get("amount_cents")?.as_int()?;
                    Some(Value::String(format!("${}.{:02}", cents / 100, cents % 100)))
                }
                _ => None,
            }
        }
    }

    #[test]
    fn test_capability_delegation() {
        let mut r = row(&[("amount_cents", Value::Int(1250))]);
        r.extend_capabilities([Arc::new(DollarAmount) as Arc<dyn Capability>]);

        assert_eq!(r.invoke("amount_usd"), Some(Value::String("$12.50".into())));
        assert_eq!(r.invoke("unknown"), None);
    }
}
