//! HTTP action surface
//!
//! Axum server with:
//! - Cookie session gate on everything but /health and /login
//! - Request tracing
//! - Graceful shutdown with an explicit pool close
//! - JSON responses: `{"success": true, "refresh": [...]}` or `{"error": ...}`

pub mod error;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{run_server, AppState, ServerConfig};
