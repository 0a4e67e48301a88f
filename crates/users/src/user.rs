use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatewaysim_core::{
    DomainError, DomainResult, Resource, ResourceId, ResourceKind, optional_text, required_text,
};

/// Role assigned when a create request does not name one.
pub const DEFAULT_ROLE: &str = "user";

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

/// Create input. Every field is optional at the wire level so that a
/// missing `name`/`email` is reported as a bad request rather than a parse
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Partial update input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl Resource for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const KIND: ResourceKind = ResourceKind {
        singular: "user",
        plural: "users",
        label: "User",
    };

    fn id(&self) -> &ResourceId {
        &self.id
    }

    fn from_draft(id: ResourceId, draft: NewUser, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let (Some(name), Some(email)) = (required_text(draft.name), required_text(draft.email))
        else {
            return Err(DomainError::bad_request("Name and email are required"));
        };

        Ok(Self {
            id,
            name,
            email,
            role: optional_text(draft.role).unwrap_or_else(default_role),
            created_at,
        })
    }

    fn with_id(self, id: ResourceId) -> Self {
        Self { id, ..self }
    }

    fn apply_patch(&mut self, patch: UserPatch) -> DomainResult<()> {
        if let Some(name) = optional_text(patch.name) {
            self.name = name;
        }
        if let Some(email) = optional_text(patch.email) {
            self.email = email;
        }
        if let Some(role) = optional_text(patch.role) {
            self.role = role;
        }
        Ok(())
    }
}
