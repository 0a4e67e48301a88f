//! Resource identities and the strategies that assign them.

use core::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identity of a record within its collection.
///
/// Opaque string on the wire; generators decide its shape (decimal counter
/// or UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value when the id is a plain decimal counter value.
    pub fn as_counter(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl core::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Source of fresh identities for a collection.
///
/// Generators only propose ids; the collection still rejects duplicates on
/// insert.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ResourceId;
}

impl<G> IdGenerator for std::sync::Arc<G>
where
    G: IdGenerator + ?Sized,
{
    fn next_id(&self) -> ResourceId {
        (**self).next_id()
    }
}

/// Monotonic decimal counter ("1", "2", ...).
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Start after the largest numeric id among `existing` (or at 1).
    pub fn following<'a>(existing: impl IntoIterator<Item = &'a ResourceId>) -> Self {
        let max = existing
            .into_iter()
            .filter_map(ResourceId::as_counter)
            .max()
            .unwrap_or(0);
        Self::starting_at(max.saturating_add(1))
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> ResourceId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ResourceId(n.to_string())
    }
}

/// Time-ordered UUIDv7 identities.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> ResourceId {
        ResourceId(Uuid::now_v7().to_string())
    }
}

/// Configurable choice of generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    #[default]
    Sequential,
    Uuid,
}

impl FromStr for IdStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "counter" => Ok(Self::Sequential),
            "uuid" => Ok(Self::Uuid),
            other => Err(DomainError::bad_request(format!(
                "unknown id strategy `{other}` (expected `sequential` or `uuid`)"
            ))),
        }
    }
}
