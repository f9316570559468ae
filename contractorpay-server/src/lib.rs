//! contractorpay-server: HTTP action surface for the back office
//!
//! Exposes form-based actions for workers, clients, transactions, and
//! user administration, backed by Postgres. Every mutating action returns
//! `{"success": true, "refresh": [...]}` or `{"error": "..."}` and the
//! caller re-fetches the listed views after a success.

pub mod auth;
pub mod db;
pub mod http;
pub mod storage;

pub use http::{run_server, ServerConfig};
