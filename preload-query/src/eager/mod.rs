//! Association resolution: eager-load specs, loaders, and merging.
//!
//! This module is the core of the engine:
//! - [`EagerLoad`] describes one request to populate an association,
//!   possibly with further nested requests ("through" chains)
//! - `loader` dispatches an association reference to its loading strategy
//!   and runs it over a batch of parent rows
//! - `merge` groups fetched child rows by key and assigns them to parents
//! - `optimize` narrows intermediate "through" queries to the columns the
//!   chain actually needs
//! - [`AdHocEagerLoad`] loads associations defined by raw SQL instead of
//!   declared metadata

mod ad_hoc;
mod loader;
mod merge;
mod optimize;
mod spec;

pub use ad_hoc::AdHocEagerLoad;
pub use spec::{EagerLoad, Optimizer, Scope, eager_load};

pub(crate) use loader::{LoadContext, resolve_all};
