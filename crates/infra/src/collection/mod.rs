//! Resource collection storage abstractions.

pub mod in_memory;

pub use in_memory::InMemoryCollection;

use std::sync::Arc;

use gatewaysim_core::{DomainError, DomainResult, Resource, ResourceId};
use thiserror::Error;

/// Why an insert was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// A record with this id already exists; the collection is unchanged.
    #[error("duplicate id: {0}")]
    DuplicateId(ResourceId),

    /// The backing store could not be accessed.
    #[error("collection unavailable: {0}")]
    Unavailable(String),
}

impl From<InsertError> for DomainError {
    fn from(value: InsertError) -> Self {
        DomainError::internal(value.to_string())
    }
}

/// Ordered, id-unique collection of one resource type.
///
/// Every method is atomic with respect to every other method on the same
/// collection.
pub trait Collection<R: Resource>: Send + Sync {
    fn list(&self) -> DomainResult<Vec<R>>;
    fn get(&self, id: &ResourceId) -> DomainResult<Option<R>>;
    /// Append a record, refusing an id that is already present.
    fn insert(&self, record: R) -> Result<(), InsertError>;
    /// Read-modify-write a single record.
    ///
    /// Returns `Ok(None)` when the id is absent. If `mutate` fails the stored
    /// record is left untouched.
    fn update(
        &self,
        id: &ResourceId,
        mutate: &mut dyn FnMut(&mut R) -> DomainResult<()>,
    ) -> DomainResult<Option<R>>;
    /// Remove and return the record, `Ok(None)` when the id is absent.
    fn remove(&self, id: &ResourceId) -> DomainResult<Option<R>>;
    fn len(&self) -> DomainResult<usize>;
}

impl<R, S> Collection<R> for Arc<S>
where
    R: Resource,
    S: Collection<R> + ?Sized,
{
    fn list(&self) -> DomainResult<Vec<R>> {
        (**self).list()
    }

    fn get(&self, id: &ResourceId) -> DomainResult<Option<R>> {
        (**self).get(id)
    }

    fn insert(&self, record: R) -> Result<(), InsertError> {
        (**self).insert(record)
    }

    fn update(
        &self,
        id: &ResourceId,
        mutate: &mut dyn FnMut(&mut R) -> DomainResult<()>,
    ) -> DomainResult<Option<R>> {
        (**self).update(id, mutate)
    }

    fn remove(&self, id: &ResourceId) -> DomainResult<Option<R>> {
        (**self).remove(id)
    }

    fn len(&self) -> DomainResult<usize> {
        (**self).len()
    }
}
