//! Repository implementations for database access
//!
//! Each repository borrows the shared pool and issues single-statement
//! queries. Uniqueness and cascade rules live in the schema; constraint
//! violations are mapped into `DbError` variants here.

pub mod clients;
pub mod transactions;
pub mod users;
pub mod workers;

pub use clients::{Client, ClientFields, ClientRepo};
pub use transactions::{
    DashboardStats, NewTransaction, Transaction, TransactionRepo, TransactionUpdate,
    TransactionWithNames,
};
pub use users::{NewUser, User, UserRepo};
pub use workers::{Worker, WorkerFields, WorkerRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} already exists: '{value}'")]
    Duplicate { resource: &'static str, value: String },

    #[error("invalid stored value in column {column}: '{value}'")]
    InvalidColumn { column: &'static str, value: String },
}

impl DbError {
    /// Map a unique-constraint violation to `Duplicate`, passing other
    /// errors through untouched.
    pub(crate) fn on_unique(err: sqlx::Error, resource: &'static str, value: &str) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => Self::Duplicate {
                resource,
                value: value.to_owned(),
            },
            _ => Self::Sqlx(err),
        }
    }

    /// Map a foreign-key violation to `NotFound` for the referenced row.
    pub(crate) fn on_foreign_key(err: sqlx::Error, resource: &'static str, id: &str) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_foreign_key_violation() => Self::NotFound {
                resource,
                id: id.to_owned(),
            },
            _ => Self::Sqlx(err),
        }
    }
}
