//! Startup fixtures for the in-memory collections.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use gatewaysim_catalog::Product;
use gatewaysim_core::{DomainError, Resource, ResourceId};
use gatewaysim_users::User;

use crate::collection::{Collection, InsertError};

const BUILTIN: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate {kind} id `{id}` in seed data")]
    DuplicateId { kind: &'static str, id: ResourceId },

    #[error("seeding failed: {0}")]
    Store(#[from] DomainError),
}

/// Where the initial records come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedSource {
    #[default]
    Builtin,
    Empty,
    File(PathBuf),
}

impl FromStr for SeedSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "builtin" => Self::Builtin,
            "none" | "empty" => Self::Empty,
            path => Self::File(PathBuf::from(path)),
        })
    }
}

/// Initial records for every collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeedSet {
    pub users: Vec<User>,
    pub products: Vec<Product>,
}

impl SeedSet {
    pub fn builtin() -> Result<Self, SeedError> {
        Ok(serde_json::from_str(BUILTIN)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn load(source: &SeedSource) -> Result<Self, SeedError> {
        match source {
            SeedSource::Builtin => Self::builtin(),
            SeedSource::Empty => Ok(Self::default()),
            SeedSource::File(path) => Self::from_file(path),
        }
    }
}

/// Insert seed records in order. Returns the number inserted.
pub fn populate<R: Resource>(
    collection: &dyn Collection<R>,
    records: Vec<R>,
) -> Result<usize, SeedError> {
    let total = records.len();
    for record in records {
        match collection.insert(record) {
            Ok(()) => {}
            Err(InsertError::DuplicateId(id)) => {
                return Err(SeedError::DuplicateId {
                    kind: R::KIND.singular,
                    id,
                });
            }
            Err(e) => return Err(SeedError::Store(e.into())),
        }
    }
    tracing::debug!(kind = R::KIND.plural, count = total, "seeded collection");
    Ok(total)
}
