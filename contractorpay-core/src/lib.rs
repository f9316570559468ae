//! contractorpay-core: domain types and configuration
//!
//! Shared between the HTTP server and the CLI. All user input is validated
//! when constructing these types; invalid input returns a `ValidationError`,
//! never a panic.

pub mod config;
pub mod models;

pub use config::AppConfig;
pub use models::{
    Amount, Counterparty, ReceiptUpload, Role, TransactionKind, Username, ValidationError,
};
