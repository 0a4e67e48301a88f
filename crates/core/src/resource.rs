//! Resource capability trait: one implementation per record type.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainResult;
use crate::id::ResourceId;

/// Names a resource type is addressed and reported by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// JSON key wrapping a single record (`"user"`).
    pub singular: &'static str,
    /// JSON key wrapping the list, also the route segment (`"users"`).
    pub plural: &'static str,
    /// Display name used in messages (`"User"`).
    pub label: &'static str,
}

/// A record type that can live in a collection and be served by the
/// generic resource handler.
///
/// `Draft` is the create input and `Patch` the partial update input. Both are
/// deserialized from the request body; an empty object must deserialize to a
/// patch that changes nothing.
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    type Draft: DeserializeOwned;
    type Patch: DeserializeOwned + Default;

    const KIND: ResourceKind;

    fn id(&self) -> &ResourceId;

    /// Build a record from a draft, rejecting missing required fields with
    /// `DomainError::BadRequest`.
    fn from_draft(
        id: ResourceId,
        draft: Self::Draft,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self>;

    /// The same record under a different identity.
    fn with_id(self, id: ResourceId) -> Self;

    /// Overwrite the fields the patch carries; everything else is retained.
    ///
    /// Must validate the whole patch before touching `self`, so a rejected
    /// patch leaves the record unchanged.
    fn apply_patch(&mut self, patch: Self::Patch) -> DomainResult<()>;
}

/// Presence check for a required text field: blank counts as missing.
pub fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Patch semantics for a text field: blank leaves the prior value alone.
pub fn optional_text(value: Option<String>) -> Option<String> {
    required_text(value)
}
