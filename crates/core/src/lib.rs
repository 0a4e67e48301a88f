//! `gatewaysim-core` — resource foundation building blocks.
//!
//! This crate contains **pure** primitives shared by every resource type
//! (no IO, no HTTP, no storage).

pub mod error;
pub mod id;
pub mod request;
pub mod resource;

pub use error::{DomainError, DomainResult};
pub use id::{IdGenerator, IdStrategy, ResourceId, SequentialIds, UuidIds};
pub use request::{Method, Reply, ReplyStatus, ResourceRequest, UnsupportedMethod};
pub use resource::{Resource, ResourceKind, optional_text, required_text};
