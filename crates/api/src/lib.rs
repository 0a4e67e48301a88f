//! HTTP API: server, routing, and request/response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;

pub use config::{ApiConfig, ConfigError};
