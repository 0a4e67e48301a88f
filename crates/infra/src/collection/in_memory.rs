use std::sync::{PoisonError, RwLock};

use gatewaysim_core::{DomainError, DomainResult, Resource, ResourceId};

use super::{Collection, InsertError};

/// In-memory collection for the lifetime of the process.
///
/// A single lock guards the whole list, so concurrent requests are applied
/// one at a time.
#[derive(Debug)]
pub struct InMemoryCollection<R> {
    inner: RwLock<Vec<R>>,
}

impl<R> InMemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<R> Default for InMemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::internal("collection lock poisoned")
}

impl<R: Resource> Collection<R> for InMemoryCollection<R> {
    fn list(&self) -> DomainResult<Vec<R>> {
        let records = self.inner.read().map_err(poisoned)?;
        Ok(records.clone())
    }

    fn get(&self, id: &ResourceId) -> DomainResult<Option<R>> {
        let records = self.inner.read().map_err(poisoned)?;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    fn insert(&self, record: R) -> Result<(), InsertError> {
        let mut records = self
            .inner
            .write()
            .map_err(|_| InsertError::Unavailable("collection lock poisoned".into()))?;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(InsertError::DuplicateId(record.id().clone()));
        }
        records.push(record);
        Ok(())
    }

    fn update(
        &self,
        id: &ResourceId,
        mutate: &mut dyn FnMut(&mut R) -> DomainResult<()>,
    ) -> DomainResult<Option<R>> {
        let mut records = self.inner.write().map_err(poisoned)?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };

        // Mutate a copy so a failing closure cannot leave a half-applied record.
        let mut next = slot.clone();
        mutate(&mut next)?;
        *slot = next.clone();
        Ok(Some(next))
    }

    fn remove(&self, id: &ResourceId) -> DomainResult<Option<R>> {
        let mut records = self.inner.write().map_err(poisoned)?;
        Ok(records
            .iter()
            .position(|r| r.id() == id)
            .map(|idx| records.remove(idx)))
    }

    fn len(&self) -> DomainResult<usize> {
        let records = self.inner.read().map_err(poisoned)?;
        Ok(records.len())
    }
}
