//! Generic driven ports for loading and storing entities.
//!
//! Repositories are keyed by a domain value and receive an opaque context
//! (`C`, `()` by default) that adapters may use for tenancy or tracing.
//! A `find` that matches nothing returns `Ok(None)`; errors are reserved for
//! storage failures and for stored data that breaks a domain invariant.

use async_trait::async_trait;

use crate::domain::Identified;

use super::define_port_error;

define_port_error! {
    /// Failures raised by repository adapters.
    pub enum PersistenceError {
        /// Connectivity, transaction or constraint failure in the store.
        Io { message: String } => "persistence i/o failed: {message}",
        /// Stored data violates a domain invariant.
        DataConsistency { message: String } => "stored data is inconsistent: {message}",
        /// The adapter broke its own contract.
        Unexpected { message: String } => "unexpected persistence failure: {message}",
    }
}

/// Load an entity `T` by key `K`.
#[async_trait]
pub trait Find<K, T, C = ()>: Send + Sync
where
    K: Sync,
    T: Send,
    C: Sync,
{
    /// Return the entity for `key`, or `None` when nothing matches.
    async fn find(&self, key: &K, ctx: &C) -> Result<Option<T>, PersistenceError>;
}

/// Store an entity `T` atomically and return its identifier.
#[async_trait]
pub trait Persist<T, C = ()>: Send + Sync
where
    T: Identified + Sync,
    C: Sync,
{
    /// Append every fact carried by `entity` in a single unit of work.
    async fn persist(&self, entity: &T, ctx: &C) -> Result<T::Id, PersistenceError>;
}
