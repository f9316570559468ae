//! Database layer - connection pool and repositories
//!
//! - Single process-wide pool, initialized lazily exactly once
//! - List queries use JOINs for display names (no N+1)
//! - Unique and foreign-key rules live in DB constraints; conflicts are
//!   mapped to errors rather than checked-then-inserted
//! - Cascade cleanup of a worker's or client's transactions is enforced by
//!   the schema, not by application code

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{acquire, shutdown};
pub use repos::DbError;
