//! Infrastructure layer: in-memory collections, the generic resource
//! handler, and startup seed fixtures.

pub mod collection;
pub mod handler;
pub mod seed;

pub use collection::{Collection, InMemoryCollection, InsertError};
pub use handler::ResourceHandler;
pub use seed::{SeedError, SeedSet, SeedSource};
