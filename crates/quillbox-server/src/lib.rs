//! HTTP server for the Quillbox notes API.
//!
//! Wires the core services to axum: configuration loading, tracing and
//! Prometheus metrics setup, the bearer-token middleware, the route table,
//! and graceful shutdown.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;

pub use config::{AppConfig, load_config};
pub use server::{QuillboxServer, build_router};
pub use state::{AppState, AuthUser};
