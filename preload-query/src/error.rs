//! Error types for eager-load resolution.
//!
//! Every error here is a caller-configuration error: none are transient and
//! none are retried. A single failure aborts the whole resolution for the
//! current batch; no partial merge state is exposed. Retry and backoff for
//! transient store failures belong to the [`QueryExecutor`] collaborator.
//!
//! [`QueryExecutor`]: crate::executor::QueryExecutor

use thiserror::Error;

/// Result type for eager-load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while resolving eager-loaded associations.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The association name is not declared on the entity or any of its
    /// subclasses.
    #[error("no association `{association}` on `{entity}` or its subclasses")]
    UnknownAssociation {
        /// Owning entity name.
        entity: String,
        /// Requested association name.
        association: String,
    },

    /// The reference kind has no loader variant.
    #[error("association `{association}` on `{entity}` has unsupported kind `{kind}`")]
    UnsupportedKind {
        /// Owning entity name.
        entity: String,
        /// Association name.
        association: String,
        /// The declared kind.
        kind: String,
    },

    /// A row lacks the attribute needed to compute a merge key, which means
    /// the base query's projection excluded a required column.
    #[error("row in `{table}` is missing column `{column}` needed for eager loading (row: {row})")]
    MissingColumn {
        /// Table the row came from.
        table: String,
        /// The absent column.
        column: String,
        /// Rendered attributes of the offending row.
        row: String,
    },

    /// An ad-hoc mapping did not contain exactly one key pair. Raised at
    /// construction time, before any query runs.
    #[error("ad hoc eager load `{name}` must map exactly one local key to one foreign key ({got} given)")]
    MalformedAdHocMapping {
        /// Ad-hoc association name.
        name: String,
        /// Number of pairs supplied.
        got: usize,
    },

    /// An ad-hoc eager load declares nested loads but no target entity, so
    /// the nested association names cannot be resolved.
    #[error("ad hoc eager load `{name}` declares nested loads but no target entity")]
    AdHocMissingEntity {
        /// Ad-hoc association name.
        name: String,
    },

    /// An entity name (root entity, association target, or polymorphic type
    /// value) is not registered in the schema.
    #[error("unknown entity `{name}`")]
    UnknownEntity {
        /// The unresolved entity name.
        name: String,
    },

    /// The query executor failed.
    #[error("executor error: {message}")]
    Executor {
        /// Executor-supplied description.
        message: String,
    },
}

impl LoadError {
    /// Unknown-association error for the given entity and name.
    pub fn unknown_association(entity: impl Into<String>, association: impl Into<String>) -> Self {
        Self::UnknownAssociation {
            entity: entity.into(),
            association: association.into(),
        }
    }

    /// Unknown-entity error.
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }

    /// Executor failure pass-through.
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
        }
    }
}
