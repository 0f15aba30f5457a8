//! Eager-load specifications.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::row::Capability;
use crate::sql::SelectQuery;
use crate::types::Select;

/// A caller-supplied query transform applied to an association's query.
pub type Scope = Arc<dyn Fn(SelectQuery) -> SelectQuery + Send + Sync>;

/// Column-narrowing policy for intermediate "through" stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optimizer {
    /// Fetch full rows at every stage.
    None,
    /// Narrow intermediate queries to the id and key columns needed to
    /// continue the chain. Only meaningful when nested specs exist.
    #[default]
    Select,
}

/// One request to eager-load an association onto a batch of rows.
///
/// # Example
///
/// ```rust
/// use preload_query::eager::EagerLoad;
///
/// // customers -> orders -> line_items -> category
/// let spec = EagerLoad::new("orders")
///     .nest(EagerLoad::new("line_items").nest(EagerLoad::new("category")));
/// assert_eq!(spec.nested.len(), 1);
/// ```
#[derive(Clone)]
pub struct EagerLoad {
    /// Name of the association to load.
    pub association: SmolStr,
    /// Optional transform over the association's base query (ordering,
    /// extra predicates, a custom projection).
    pub scope: Option<Scope>,
    /// Optional explicit column projection, shorthand for a scope that only
    /// selects columns.
    pub select: Option<Select>,
    /// Capabilities attached to every fetched row, in order.
    pub capabilities: Vec<Arc<dyn Capability>>,
    /// Attach results under this name instead of the association name.
    pub alias: Option<SmolStr>,
    /// Nested specs resolved against the fetched rows before merging.
    pub nested: Vec<EagerLoad>,
    /// Column-narrowing policy for this stage.
    pub optimizer: Optimizer,
}

impl EagerLoad {
    /// Create a spec for one association.
    pub fn new(association: impl Into<SmolStr>) -> Self {
        Self {
            association: association.into(),
            scope: None,
            select: None,
            capabilities: Vec::new(),
            alias: None,
            nested: Vec::new(),
            optimizer: Optimizer::default(),
        }
    }

    /// Apply a scope to the association's query.
    ///
    /// The scope sees the base query (already constrained to the batch's key
    /// set) and may add ordering, predicates, or a projection.
    pub fn scope(mut self, scope: impl Fn(SelectQuery) -> SelectQuery + Send + Sync + 'static) -> Self {
        self.scope = Some(Arc::new(scope));
        self
    }

    /// Project only the given columns. For maximum memory savings, select
    /// only the columns you actually need, but keep the merge key columns,
    /// which the loader reads.
    pub fn select(mut self, columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        self.select = Some(Select::columns(columns));
        self
    }

    /// Attach a capability to every row this spec fetches.
    pub fn augment(mut self, capability: Arc<dyn Capability>) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Attach results under a different name.
    pub fn r#as(mut self, name: impl Into<SmolStr>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// Nest a further eager load, resolved against this association's rows.
    pub fn nest(mut self, spec: EagerLoad) -> Self {
        self.nested.push(spec);
        self
    }

    /// Set the optimizer policy for this stage.
    pub fn optimizer(mut self, optimizer: Optimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// The slot name results are attached under.
    pub fn slot(&self) -> &SmolStr {
        self.alias.as_ref().unwrap_or(&self.association)
    }

    /// Check if this spec continues into nested stages.
    pub fn has_nested(&self) -> bool {
        !self.nested.is_empty()
    }
}

impl fmt::Debug for EagerLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EagerLoad")
            .field("association", &self.association)
            .field("scope", &self.scope.as_ref().map(|_| "<fn>"))
            .field("select", &self.select)
            .field("capabilities", &self.capabilities)
            .field("alias", &self.alias)
            .field("nested", &self.nested)
            .field("optimizer", &self.optimizer)
            .finish()
    }
}

impl From<&str> for EagerLoad {
    fn from(association: &str) -> Self {
        Self::new(association)
    }
}

/// Helper to create an eager-load spec.
pub fn eager_load(association: impl Into<SmolStr>) -> EagerLoad {
    EagerLoad::new(association)
}
