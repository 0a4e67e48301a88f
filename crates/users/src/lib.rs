//! Users resource (name, email, role).
//!
//! Pure record logic: validation on create and partial overwrite on update.

pub mod user;

pub use user::{DEFAULT_ROLE, NewUser, User, UserPatch};
