//! HTTP API: configuration, server host, routing, and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{BoundServer, Server, ServerError};
